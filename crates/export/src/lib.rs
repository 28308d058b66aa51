//! Export pipeline for drawpad
//!
//! [`ExportCoordinator`] takes an opaque snapshot of a [`painting::SurfaceHandle`],
//! encodes it with the `drawpad-encode` strategies and passes the result to a
//! [`DeliverySink`].

mod coordinator;
mod error;
mod release;
mod result;
mod sink;

pub use coordinator::ExportCoordinator;
pub use error::ExportError;
pub use release::ReleaseScheduler;
pub use result::ExportResult;
pub use sink::{DeliveryError, DeliverySink, MemorySink, TransientHandle};
