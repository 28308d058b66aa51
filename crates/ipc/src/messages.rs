//! Main IPC message enums for communication between the front end and the core.

use serde::{Deserialize, Serialize};

use crate::IpcError;
use crate::commands::{ExportFormat, ExportRequest, PaintCommand};

/// Messages from the front end to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCore {
    /// Drawing state or surface change
    PaintCommand(PaintCommand),

    /// Export the current drawing in one format
    Export(ExportRequest),

    /// Export the current drawing in several formats from a single snapshot
    ExportMany { requests: Vec<ExportRequest> },
}

/// Messages from the core back to the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreToUi {
    /// An artifact was produced and handed to the delivery sink
    Exported {
        format: ExportFormat,
        filename: Option<String>,
        mime_label: String,
        byte_len: usize,
    },

    /// Base64 export text, for the front end to show or copy
    Base64Ready { data_uri: String },

    /// An export was already in its snapshot window
    Busy,

    /// Error notification
    Error { code: String, message: String },
}

impl UiToCore {
    /// Parse a message from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        let trimmed = json.trim();
        if trimmed.is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}

impl CoreToUi {
    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Tool;

    #[test]
    fn test_parse_export_message() {
        let msg = UiToCore::from_json(
            r#"{"type":"Export","data":{"format":"jpeg","quality":0.9,"filename":"a.jpg"}}"#,
        )
        .unwrap();
        match msg {
            UiToCore::Export(request) => {
                assert_eq!(request.format, ExportFormat::Jpeg);
                assert_eq!(request.quality, Some(0.9));
                assert_eq!(request.filename.as_deref(), Some("a.jpg"));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_parse_paint_message() {
        let msg = UiToCore::from_json(
            r#"{"type":"PaintCommand","data":{"SetTool":{"tool":"eraser"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            UiToCore::PaintCommand(PaintCommand::SetTool { tool: Tool::Eraser })
        ));
    }

    #[test]
    fn test_empty_message_rejected() {
        assert!(matches!(
            UiToCore::from_json("   "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            UiToCore::from_json("{not json"),
            Err(IpcError::Serialize(_))
        ));
    }

    #[test]
    fn test_reply_serialization() {
        let json = CoreToUi::Busy.to_json().unwrap();
        assert_eq!(json, r#"{"type":"Busy"}"#);

        let json = CoreToUi::Exported {
            format: ExportFormat::Bmp,
            filename: Some("drawing.bmp".into()),
            mime_label: "image/bmp".into(),
            byte_len: 70,
        }
        .to_json()
        .unwrap();
        assert!(json.contains(r#""format":"bmp""#));
        assert!(json.contains(r#""byte_len":70"#));
    }
}
