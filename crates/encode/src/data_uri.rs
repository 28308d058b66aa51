//! Base64 data URI transport encoding of the PNG output

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use drawpad_ipc::ExportFormat;
use painting::PixelBuffer;

use crate::{EncodeError, Encoded, FormatEncoder, encode_png, ignore_quality};

/// Prefix of every PNG data URI this crate writes
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Wrap PNG bytes as `data:image/png;base64,<payload>` (standard alphabet, `=` padded)
pub fn png_data_uri(png: &[u8]) -> String {
    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len().div_ceil(3) * 4);
    uri.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(png, &mut uri);
    uri
}

/// Split a base64 data URI into its media type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), EncodeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EncodeError::InvalidDataUri("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EncodeError::InvalidDataUri("missing payload separator".into()))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| EncodeError::InvalidDataUri("not base64 encoded".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| EncodeError::InvalidDataUri(e.to_string()))?;
    Ok((media_type.to_string(), bytes))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Writer;

impl FormatEncoder for Base64Writer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Base64
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        ignore_quality(ExportFormat::Base64, quality);
        let png = encode_png(buffer)?;
        Ok(Encoded::Text(png_data_uri(&png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_payload() {
        assert_eq!(png_data_uri(b"hi!?"), "data:image/png;base64,aGkhPw==");
    }

    #[test]
    fn test_writer_output_decodes_to_png() {
        let buffer = PixelBuffer::filled(3, 3, [7, 8, 9, 255]).unwrap();
        let text = Base64Writer.encode(&buffer, None).unwrap();
        let uri = text.as_text().unwrap();
        assert!(uri.starts_with(PNG_DATA_URI_PREFIX));

        let (media_type, bytes) = decode_data_uri(uri).unwrap();
        assert_eq!(media_type, "image/png");
        assert_eq!(bytes, encode_png(&buffer).unwrap());
    }

    #[test]
    fn test_rejects_malformed_uri() {
        assert!(decode_data_uri("image/png;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/png,AAAA").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    proptest! {
        #[test]
        fn prop_data_uri_inverts(bytes in proptest::collection::vec(any::<u8>(), 1..512)) {
            let (media_type, decoded) = decode_data_uri(&png_data_uri(&bytes)).unwrap();
            prop_assert_eq!(media_type, "image/png");
            prop_assert_eq!(decoded, bytes);
        }
    }
}
