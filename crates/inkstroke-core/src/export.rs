//! Encoded snapshots of the raster surface and their data URL form.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// MIME type of PNG snapshots.
pub const PNG_MIME: &str = "image/png";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),
    #[error("Invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// A surface that can serialize its current raster state.
pub trait EncodeSurface {
    /// Encode the backing store as PNG bytes.
    fn encode_png(&self) -> Result<Vec<u8>, ExportError>;
}

/// Encoded image bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: PNG_MIME.to_string(),
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Decode a base64 data URL back into bytes and MIME type.
    pub fn from_data_url(url: &str) -> Result<Self, ExportError> {
        let (header, payload) = url
            .split_once(',')
            .ok_or_else(|| ExportError::MalformedDataUrl("missing ',' separator".to_string()))?;
        let mime = header
            .strip_prefix("data:")
            .and_then(|rest| rest.strip_suffix(";base64"))
            .filter(|mime| !mime.is_empty())
            .ok_or_else(|| ExportError::MalformedDataUrl(format!("unrecognized header {:?}", header)))?;
        let bytes = STANDARD.decode(payload)?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_format() {
        let image = EncodedImage::png(b"abc".to_vec());
        assert_eq!(image.to_data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_decode_data_url() {
        let image = EncodedImage::from_data_url("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn test_decode_missing_tag() {
        for url in ["image/png;base64,AAEC", "data:;base64,AAEC", "data:image/png,AAEC", "no comma"] {
            assert!(
                matches!(EncodedImage::from_data_url(url), Err(ExportError::MalformedDataUrl(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_decode_bad_payload() {
        assert!(matches!(
            EncodedImage::from_data_url("data:image/png;base64,@@@"),
            Err(ExportError::Payload(_))
        ));
    }
}
