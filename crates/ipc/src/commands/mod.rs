//! Command types for IPC messages.

mod export;
mod paint;

pub use export::*;
pub use paint::*;
