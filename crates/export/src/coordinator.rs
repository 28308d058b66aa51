//! Export coordinator
//!
//! Runs snapshot, encode and delivery for one or more export requests.
//! Only the snapshot window is exclusive: a second export that arrives while
//! a snapshot is suspended on its capture is rejected, while encoding and
//! delivery of earlier exports may overlap later ones.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use drawpad_config::ExportSettings;
use drawpad_encode::{EncoderOptions, Encoded, encoder_for};
use drawpad_ipc::ExportRequest;
use painting::{Compositor, FrameCapture, PixelBuffer, Rgb, SurfaceHandle};
use tracing::{debug, error, info, warn};

use crate::error::ExportError;
use crate::release::ReleaseScheduler;
use crate::result::ExportResult;
use crate::sink::DeliverySink;

/// Clears the in-flight flag when the snapshot window closes, on every path
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ExportCoordinator<C, S> {
    compositor: Compositor<C>,
    sink: Arc<S>,
    options: EncoderOptions,
    release: ReleaseScheduler,
    in_flight: AtomicBool,
}

impl<C: FrameCapture, S: DeliverySink> ExportCoordinator<C, S> {
    pub fn new(capture: C, sink: Arc<S>, settings: &ExportSettings) -> Result<Self, ExportError> {
        Ok(Self {
            compositor: Compositor::new(capture).with_watchdog(settings.capture_watchdog),
            sink,
            options: EncoderOptions::from_settings(settings)?,
            release: ReleaseScheduler::new(settings.release_grace),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn release_scheduler(&self) -> &ReleaseScheduler {
        &self.release
    }

    /// True while a snapshot is suspended on its capture
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    async fn snapshot(
        &self,
        surface: &SurfaceHandle,
        background: Rgb,
    ) -> Result<PixelBuffer, ExportError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Export rejected: a snapshot is already in flight");
            return Err(ExportError::ConcurrentExportRejected);
        };
        Ok(self.compositor.snapshot(surface, background).await?)
    }

    /// Snapshot the surface, encode it for `request` and deliver the result.
    pub async fn export(
        &self,
        surface: &SurfaceHandle,
        background: Rgb,
        request: &ExportRequest,
    ) -> Result<ExportResult, ExportError> {
        debug!("ExportCoordinator::export: {}", request.format);
        let buffer = Arc::new(self.snapshot(surface, background).await?);
        let payload = self.encode(buffer, request).await?;
        self.deliver(self.package(request, payload)).await
    }

    /// Export several formats from a single snapshot.
    ///
    /// The outer error covers the shared snapshot. Each request then encodes
    /// on its own blocking worker and reports its own outcome, in request order.
    pub async fn export_many(
        &self,
        surface: &SurfaceHandle,
        background: Rgb,
        requests: &[ExportRequest],
    ) -> Result<Vec<Result<ExportResult, ExportError>>, ExportError> {
        debug!("ExportCoordinator::export_many: {} requests", requests.len());
        let buffer = Arc::new(self.snapshot(surface, background).await?);

        let tasks: Vec<_> = requests
            .iter()
            .map(|request| {
                let encoder = encoder_for(request.format, &self.options);
                let buffer = buffer.clone();
                let quality = request.quality;
                tokio::task::spawn_blocking(move || encoder.encode(&buffer, quality))
            })
            .collect();

        let mut results = Vec::with_capacity(requests.len());
        for (request, task) in requests.iter().zip(tasks) {
            let outcome = match task.await {
                Ok(Ok(payload)) => self.deliver(self.package(request, payload)).await,
                Ok(Err(e)) => Err(ExportError::from(e)),
                Err(e) => Err(ExportError::Worker(e.to_string())),
            };
            if let Err(e) = &outcome {
                warn!("Export of {} failed: {}", request.format, e);
            }
            results.push(outcome);
        }
        Ok(results)
    }

    /// Hand a result to the sink again, e.g. after a [`ExportError::DeliveryFailure`]
    pub async fn redeliver(&self, result: ExportResult) -> Result<ExportResult, ExportError> {
        self.deliver(result).await
    }

    async fn encode(
        &self,
        buffer: Arc<PixelBuffer>,
        request: &ExportRequest,
    ) -> Result<Encoded, ExportError> {
        let encoder = encoder_for(request.format, &self.options);
        let quality = request.quality;
        tokio::task::spawn_blocking(move || encoder.encode(&buffer, quality))
            .await
            .map_err(|e| ExportError::Worker(e.to_string()))?
            .map_err(ExportError::from)
    }

    fn package(&self, request: &ExportRequest, payload: Encoded) -> ExportResult {
        ExportResult {
            format: request.format,
            payload,
            mime_label: request.format.mime_label(),
            suggested_filename: request.suggested_filename(),
        }
    }

    /// Sinks may block on I/O, so delivery runs on a blocking worker
    async fn deliver(&self, result: ExportResult) -> Result<ExportResult, ExportError> {
        let sink = self.sink.clone();
        let (result, delivered) = tokio::task::spawn_blocking(move || {
            let delivered = sink.deliver(&result);
            (result, delivered)
        })
        .await
        .map_err(|e| ExportError::Worker(e.to_string()))?;

        match delivered {
            Ok(handle) => {
                info!(
                    "Exported {} ({} bytes, {})",
                    result.format,
                    result.payload.len(),
                    result.suggested_filename.as_deref().unwrap_or("no filename")
                );
                if let Some(handle) = handle {
                    self.release.schedule(self.sink.clone(), handle);
                }
                Ok(result)
            }
            Err(source) => {
                error!("Delivery of {} failed: {}", result.format, source);
                Err(ExportError::DeliveryFailure {
                    source,
                    result: Box::new(result),
                })
            }
        }
    }
}
