use drawpad_encode::Encoded;
use drawpad_ipc::ExportFormat;

/// One encoded artifact, created per request and handed to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub payload: Encoded,
    pub mime_label: &'static str,
    /// None for text-only deliveries (Base64) without an explicit filename
    pub suggested_filename: Option<String>,
}

impl ExportResult {
    pub fn bytes(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    pub fn text(&self) -> Option<&str> {
        self.payload.as_text()
    }
}
