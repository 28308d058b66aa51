//! drawpad painting system - surface, snapshots and compositing
//!
//! This crate provides the raster side of the export pipeline:
//! - [`surface::Surface`] - the live straight-alpha RGBA8 drawing surface
//! - [`stroke::StrokeMask`] - already-rasterized stroke coverage
//! - [`handle::SurfaceHandle`] - shared, lock-guarded access to the surface
//! - [`capture`] - the suspending capture-then-decode step
//! - [`compositor`] - opaque snapshots over a background color
//! - [`pixel_buffer::PixelBuffer`] - the immutable snapshot handed to encoders

pub mod blend;
pub mod capture;
pub mod compositor;
pub mod constants;
pub mod handle;
pub mod pixel_buffer;
pub mod stroke;
pub mod surface;
pub mod types;
pub mod validation;

pub use capture::*;
pub use compositor::*;
pub use constants::*;
pub use handle::*;
pub use pixel_buffer::*;
pub use stroke::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
