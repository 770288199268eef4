//! QR bitmap rendering and logo compositing.
//!
//! Renders a QR code for a payload at fixed options, optionally stamps a
//! logo on a rounded white badge in the middle, and encodes the result as PNG.

pub mod compose;
pub mod encode;
pub mod logo;
pub mod qr;

// Re-exports for convenience
pub use compose::{composite, LogoPlacement};
pub use encode::{encode_png, EncodedImage};
pub use logo::{LogoAsset, LogoError, DEFAULT_MAX_LOGO_BYTES};
pub use qr::{render_qr, EcLevel, QrOptions};

/// Errors raised while producing a QR image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("QR encode error: {0}")]
    Bitmap(String),

    #[error("Failed to load logo image ({0}). Please try another file.")]
    LogoDecode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),
}

/// Render a QR code for `payload` and composite the optional logo on it.
///
/// This is the whole blocking pipeline; callers on an async runtime should
/// run it on the blocking pool.
pub fn render_with_logo(
    payload: &str,
    options: &QrOptions,
    logo: Option<&LogoAsset>,
) -> Result<EncodedImage, ImageError> {
    let bitmap = render_qr(payload, options)?;
    composite(bitmap, logo)
}
