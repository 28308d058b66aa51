//! IPC message protocol for drawpad
//!
//! Defines all message types exchanged between the drawing front end and the
//! export core. Messages travel as tagged JSON (`{"type": ..., "data": ...}`).

mod commands;
mod error;
mod messages;

pub use commands::*;
pub use error::IpcError;
pub use messages::*;
