//! Shared handle to the live surface
//!
//! The drawing front end and the export path both reach the surface through
//! a [`SurfaceHandle`]. A snapshot holds the handle's lock for its whole
//! suspension window, so mutations issued meanwhile wait and apply afterwards.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

use crate::stroke::StrokeMask;
use crate::surface::{Region, Surface};
use crate::types::{Rgb, Tool};
use crate::validation::RasterError;

#[derive(Debug, Clone, Default)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<Option<Surface>>>,
}

impl SurfaceHandle {
    pub fn new(surface: Surface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(surface))),
        }
    }

    /// A handle whose surface has not been created yet
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Attach (or replace) the surface behind this handle
    pub async fn attach(&self, surface: Surface) {
        *self.inner.lock().await = Some(surface);
    }

    /// Lock the surface slot. Held across a snapshot's capture.
    pub async fn lock(&self) -> MutexGuard<'_, Option<Surface>> {
        self.inner.lock().await
    }

    /// Run `f` against the surface, waiting for any in-flight snapshot first
    pub async fn with_surface<R>(
        &self,
        f: impl FnOnce(&mut Surface) -> R,
    ) -> Result<R, RasterError> {
        let mut guard = self.inner.lock().await;
        let surface = guard.as_mut().ok_or(RasterError::NotInitialized)?;
        Ok(f(surface))
    }

    /// Append a rasterized stroke with the surface's current drawing state
    pub async fn apply_stroke(&self, mask: &StrokeMask) -> Result<Option<Region>, RasterError> {
        trace!("SurfaceHandle::apply_stroke: {}x{} mask", mask.width(), mask.height());
        self.with_surface(|surface| surface.apply_stroke(mask)).await
    }

    pub async fn select_tool(&self, tool: Tool) -> Result<(), RasterError> {
        self.with_surface(|surface| surface.select_tool(tool)).await
    }

    pub async fn set_pen_color(&self, color: Rgb) -> Result<(), RasterError> {
        self.with_surface(|surface| surface.set_pen_color(color)).await
    }

    pub async fn flatten(&self, background: Rgb) -> Result<(), RasterError> {
        self.with_surface(|surface| surface.flatten(background)).await
    }

    /// Copy of the current pixel bytes
    pub async fn pixel_bytes(&self) -> Result<Vec<u8>, RasterError> {
        self.with_surface(|surface| surface.as_bytes().to_vec()).await
    }
}
