//! One drawing session: the live surface, its background and the export path

use std::cell::Cell;

use drawpad_export::{DeliverySink, ExportCoordinator, ExportError, ExportResult};
use drawpad_ipc::{CoreToUi, ExportRequest, PaintCommand, Tool as ToolSelector, UiToCore};
use painting::{FrameCapture, RasterError, Rgb, SurfaceHandle, Tool};
use tracing::{debug, warn};

pub struct Session<C, S> {
    surface: SurfaceHandle,
    background: Cell<Rgb>,
    coordinator: ExportCoordinator<C, S>,
}

impl<C: FrameCapture, S: DeliverySink> Session<C, S> {
    pub fn new(surface: SurfaceHandle, coordinator: ExportCoordinator<C, S>) -> Self {
        Self {
            surface,
            background: Cell::new(Rgb::default_background()),
            coordinator,
        }
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    pub fn background(&self) -> Rgb {
        self.background.get()
    }

    /// Handle one message and produce the replies for the front end
    pub async fn dispatch(&self, message: UiToCore) -> Vec<CoreToUi> {
        match message {
            UiToCore::PaintCommand(command) => match self.paint(command).await {
                Ok(()) => Vec::new(),
                Err(e) => vec![CoreToUi::Error {
                    code: "paint".into(),
                    message: e.to_string(),
                }],
            },
            UiToCore::Export(request) => {
                vec![reply(self.export(&request).await)]
            }
            UiToCore::ExportMany { requests } => {
                match self
                    .coordinator
                    .export_many(&self.surface, self.background(), &requests)
                    .await
                {
                    Ok(results) => results.into_iter().map(reply).collect(),
                    Err(e) => vec![reply(Err(e))],
                }
            }
        }
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportResult, ExportError> {
        self.coordinator
            .export(&self.surface, self.background(), request)
            .await
    }

    async fn paint(&self, command: PaintCommand) -> Result<(), RasterError> {
        debug!("Paint command: {:?}", command);
        match command {
            PaintCommand::SetTool { tool } => {
                let tool = match tool {
                    ToolSelector::Pen => Tool::Pen,
                    ToolSelector::Eraser => Tool::Eraser,
                };
                self.surface.select_tool(tool).await
            }
            PaintCommand::SetPenColor { color } => self.surface.set_pen_color(color.parse()?).await,
            PaintCommand::SetBackgroundColor { color } => {
                self.background.set(color.parse()?);
                Ok(())
            }
            PaintCommand::Stroke { points } => {
                let region = self
                    .surface
                    .with_surface(|surface| {
                        surface
                            .stroke_mask(&points)
                            .map(|mask| surface.apply_stroke(&mask))
                    })
                    .await??;
                if region.is_none() {
                    debug!("Stroke fell outside the surface");
                }
                Ok(())
            }
            PaintCommand::Flatten => self.surface.flatten(self.background()).await,
        }
    }
}

/// Map an export outcome to its front-end reply
fn reply(outcome: Result<ExportResult, ExportError>) -> CoreToUi {
    match outcome {
        Ok(result) => match result.text() {
            Some(text) => CoreToUi::Base64Ready {
                data_uri: text.to_string(),
            },
            None => CoreToUi::Exported {
                format: result.format,
                filename: result.suggested_filename.clone(),
                mime_label: result.mime_label.to_string(),
                byte_len: result.bytes().len(),
            },
        },
        Err(ExportError::ConcurrentExportRejected) => CoreToUi::Busy,
        Err(e) => {
            warn!("Export failed: {}", e);
            CoreToUi::Error {
                code: e.code().to_string(),
                message: e.to_string(),
            }
        }
    }
}
