//! QR bitmap rendering.
//!
//! Matrix encoding comes from the `qrcode` crate; rasterisation is done here
//! so the quiet zone can be any number of modules and the output is exactly
//! `side` pixels wide.

use image::{Rgba, RgbaImage};
use qrcode::QrCode;
use tracing::debug;

pub use qrcode::EcLevel;

use crate::ImageError;

/// Rendering options for [`render_qr`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrOptions {
    pub ec_level: EcLevel,
    /// Quiet zone width, in modules.
    pub margin: u32,
    /// Output width and height, in pixels.
    pub side: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            margin: 2,
            side: 512,
            dark: Rgba([0, 0, 0, 255]),
            light: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Generate a QR code bitmap for `payload`.
///
/// Each output pixel is mapped back onto the module grid with a fractional
/// scale of `side / (modules + 2 * margin)`, so the image is always
/// `side x side` regardless of the symbol version.
pub fn render_qr(payload: &str, options: &QrOptions) -> Result<RgbaImage, ImageError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), options.ec_level)
        .map_err(|e| ImageError::Bitmap(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let total = module_count + options.margin * 2;
    if options.side < total {
        return Err(ImageError::Bitmap(format!(
            "output side {} is smaller than the symbol ({} modules)",
            options.side, total
        )));
    }

    let scale = f64::from(options.side) / f64::from(total);
    let scaled_margin = f64::from(options.margin) * scale;
    let inner_end = f64::from(options.side) - scaled_margin;

    debug!(
        module_count,
        side = options.side,
        scale,
        "Rasterising QR code"
    );

    let mut img = RgbaImage::from_pixel(options.side, options.side, options.light);

    for y in 0..options.side {
        let fy = f64::from(y);
        if fy < scaled_margin || fy >= inner_end {
            continue;
        }
        let my = ((fy - scaled_margin) / scale).floor() as u32;

        for x in 0..options.side {
            let fx = f64::from(x);
            if fx < scaled_margin || fx >= inner_end {
                continue;
            }
            let mx = ((fx - scaled_margin) / scale).floor() as u32;

            if mx >= module_count || my >= module_count {
                continue;
            }
            if modules[(my * module_count + mx) as usize] == qrcode::Color::Dark {
                img.put_pixel(x, y, options.dark);
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_qr_is_exactly_side_pixels() {
        let img = render_qr("https://example.com", &QrOptions::default()).unwrap();
        assert_eq!(img.dimensions(), (512, 512));
    }

    #[test]
    fn render_qr_keeps_quiet_zone_light() {
        let options = QrOptions::default();
        let img = render_qr("https://example.com", &options).unwrap();
        // Two modules of quiet zone are well over 20 px at this version.
        for i in 0..20 {
            assert_eq!(*img.get_pixel(i, i), options.light);
            assert_eq!(*img.get_pixel(511 - i, i), options.light);
        }
    }

    #[test]
    fn render_qr_draws_finder_pattern_corner() {
        let options = QrOptions::default();
        let img = render_qr("https://example.com", &options).unwrap();
        // The top-left finder pattern starts right after the quiet zone.
        let module_count = QrCode::with_error_correction_level("https://example.com", EcLevel::H)
            .unwrap()
            .width() as f64;
        let scale = 512.0 / (module_count + 4.0);
        let inside = (2.0 * scale + scale / 2.0) as u32;
        assert_eq!(*img.get_pixel(inside, inside), options.dark);
    }

    #[test]
    fn render_qr_is_deterministic() {
        let a = render_qr("https://example.com/a", &QrOptions::default()).unwrap();
        let b = render_qr("https://example.com/a", &QrOptions::default()).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn render_qr_rejects_payload_over_capacity() {
        let payload = format!("https://example.com/{}", "x".repeat(3000));
        let err = render_qr(&payload, &QrOptions::default()).unwrap_err();
        assert!(matches!(err, ImageError::Bitmap(_)));
    }

    #[test]
    fn render_qr_rejects_side_smaller_than_symbol() {
        let options = QrOptions {
            side: 10,
            ..QrOptions::default()
        };
        let err = render_qr("https://example.com", &options).unwrap_err();
        assert!(err.to_string().contains("smaller than the symbol"));
    }
}
