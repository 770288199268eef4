//! Logo compositing: a rounded white badge with the logo stamped on top,
//! centred on the QR bitmap.

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use tracing::debug;

use crate::encode::{encode_png, EncodedImage};
use crate::logo::LogoAsset;
use crate::ImageError;

/// The logo square is `side / LOGO_SCALE_DIVISOR` pixels wide.
pub const LOGO_SCALE_DIVISOR: f32 = 4.5;
/// Badge margin around the logo, in pixels.
pub const BADGE_PADDING: u32 = 4;
pub const BADGE_CORNER_RADIUS: u32 = 8;

const BADGE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Where the badge and logo land on a square bitmap of a given side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub logo_x: u32,
    pub logo_y: u32,
    pub logo_size: u32,
    pub badge_x: u32,
    pub badge_y: u32,
    pub badge_size: u32,
}

impl LogoPlacement {
    pub fn for_side(side: u32) -> Self {
        let logo_size = ((side as f32 / LOGO_SCALE_DIVISOR).round() as u32).max(1);
        let logo_x = (side - logo_size.min(side)) / 2;
        let logo_y = logo_x;

        let badge_x = logo_x.saturating_sub(BADGE_PADDING);
        let badge_y = badge_x;
        let badge_size = (logo_size + BADGE_PADDING * 2).min(side - badge_x);

        Self {
            logo_x,
            logo_y,
            logo_size,
            badge_x,
            badge_y,
            badge_size,
        }
    }

    /// Whether pixel `(x, y)` lies inside the badge square.
    pub fn badge_contains(&self, x: u32, y: u32) -> bool {
        (self.badge_x..self.badge_x + self.badge_size).contains(&x)
            && (self.badge_y..self.badge_y + self.badge_size).contains(&y)
    }
}

/// Composite an optional logo onto a QR bitmap and encode it as PNG.
///
/// Without a logo the bitmap is encoded untouched. A logo that fails to
/// decode is an error; there is no silent fallback to a plain code.
pub fn composite(qr: RgbaImage, logo: Option<&LogoAsset>) -> Result<EncodedImage, ImageError> {
    let Some(logo) = logo else {
        return encode_png(&qr);
    };

    let decoded = logo.decode()?;
    let mut canvas = qr;
    let side = canvas.width().min(canvas.height());
    let placement = LogoPlacement::for_side(side);

    debug!(
        side,
        logo_size = placement.logo_size,
        badge_size = placement.badge_size,
        source_w = decoded.width(),
        source_h = decoded.height(),
        "Compositing logo"
    );

    paint_badge(&mut canvas, &placement);
    let scaled = decoded.resize_exact(placement.logo_size, placement.logo_size, FilterType::Lanczos3);
    overlay(&mut canvas, &scaled, placement.logo_x, placement.logo_y);

    encode_png(&canvas)
}

/// Fill the badge square with rounded corners: two crossing rectangles plus
/// a disc in each corner.
fn paint_badge(canvas: &mut RgbaImage, placement: &LogoPlacement) {
    let size = placement.badge_size as i32;
    let r = BADGE_CORNER_RADIUS.min(placement.badge_size.saturating_sub(1) / 2) as i32;
    let (x, y) = (placement.badge_x as i32, placement.badge_y as i32);
    let inner = (size - 2 * r) as u32;

    draw_filled_rect_mut(canvas, Rect::at(x + r, y).of_size(inner, size as u32), BADGE_COLOR);
    draw_filled_rect_mut(canvas, Rect::at(x, y + r).of_size(size as u32, inner), BADGE_COLOR);

    if r == 0 {
        return;
    }
    let far = size - 1 - r;
    for (cx, cy) in [(r, r), (far, r), (r, far), (far, far)] {
        draw_filled_circle_mut(canvas, (x + cx, y + cy), r, BADGE_COLOR);
    }
}

/// Overlay `top` image onto `base` at the given position.
///
/// The `top` image is alpha-composited over the base.
fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, *pixel);
            } else if alpha > 0.01 {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_pixel(bg, pixel, alpha);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

/// Blend `fg` over an opaque `bg`. The result is always opaque, since the
/// logo only ever lands on the badge or the QR bitmap.
fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}
