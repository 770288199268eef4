//! PNG encoding and the opaque encoded-image handle.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use image::{ImageFormat, RgbaImage};

use crate::ImageError;

/// An encoded image ready to be displayed or downloaded.
///
/// Cheap to clone; the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
    mime: &'static str,
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: "image/png",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render as a `data:` URL for inline display.
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{b64}", self.mime)
    }
}

/// Encode an RGBA bitmap as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<EncodedImage, ImageError> {
    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(EncodedImage::png(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_png_writes_png_signature() {
        let img = RgbaImage::new(4, 4);
        let encoded = encode_png(&img).unwrap();
        assert_eq!(&encoded.bytes()[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(encoded.mime(), "image/png");
    }

    #[test]
    fn data_url_has_png_prefix() {
        let encoded = EncodedImage::png(vec![1, 2, 3]);
        assert_eq!(encoded.to_data_url(), "data:image/png;base64,AQID");
    }
}
