//! Logo uploads: size and type checks at attach time, decoding at render time.

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::ImageError;

/// Default upload cap for logo files (1 MiB).
pub const DEFAULT_MAX_LOGO_BYTES: usize = 1024 * 1024;

/// Formats accepted as logos.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("Logo image must be smaller than {}.", human_size(.max))]
    TooLarge { size: usize, max: usize },
    #[error("Unsupported logo type: {0} (use PNG, JPEG, GIF, WebP or BMP)")]
    Unsupported(String),
    #[error("Failed to read the logo file: {0}")]
    Read(String),
}

/// A logo attached to a generation request. Never persisted.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl LogoAsset {
    /// Accept an uploaded file.
    ///
    /// An empty upload means "no logo" and yields `Ok(None)`. When the client
    /// did not send a usable content type, the format is sniffed from the bytes.
    pub fn from_upload(
        bytes: Vec<u8>,
        content_type: Option<&str>,
        max_bytes: usize,
    ) -> Result<Option<Self>, LogoError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        if bytes.len() > max_bytes {
            return Err(LogoError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let declared = content_type
            .map(|ct| ct.split(';').next().unwrap_or("").trim())
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream");

        let format = match declared {
            Some(mime) => ImageFormat::from_mime_type(mime)
                .ok_or_else(|| LogoError::Unsupported(mime.to_string()))?,
            None => image::guess_format(&bytes)
                .map_err(|_| LogoError::Unsupported("unknown".to_string()))?,
        };
        if !ACCEPTED_FORMATS.contains(&format) {
            return Err(LogoError::Unsupported(format.to_mime_type().to_string()));
        }

        debug!(size = bytes.len(), ?format, "Logo accepted");
        Ok(Some(Self { bytes, format }))
    }

    pub fn mime(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Decode the logo. Fails if the bytes are not a valid image of the
    /// declared format.
    pub fn decode(&self) -> Result<DynamicImage, ImageError> {
        image::load_from_memory_with_format(&self.bytes, self.format)
            .map_err(|e| ImageError::LogoDecode(e.to_string()))
    }
}

fn human_size(bytes: &usize) -> String {
    let bytes = *bytes;
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}
