//! Rasterizer: executes paint commands onto a transparent overlay and
//! composites the overlay onto an opaque background.

use crate::rendering::font::FontSet;
use crate::rendering::layout::Rect;
use crate::rendering::paint::PaintCommand;
use image::{imageops, Rgb, RgbImage, Rgba, RgbaImage};

/// Source-over blend of `color` scaled by `coverage` into one pixel.
/// Out-of-bounds coordinates are ignored.
pub fn blend_pixel(target: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= target.width() as i32 || y >= target.height() as i32 {
        return;
    }
    let sa = color.0[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let dst = target.get_pixel_mut(x as u32, y as u32);
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let v = (color.0[i] as f32 * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    *dst = Rgba(out);
}

/// Blend a solid rectangle covering the pixels in `[left, right) × [top, bottom)`.
pub fn fill_rect(target: &mut RgbaImage, left: f32, top: f32, right: f32, bottom: f32, color: Rgba<u8>) {
    let x0 = left.max(0.0).floor() as i32;
    let y0 = top.max(0.0).floor() as i32;
    let x1 = right.min(target.width() as f32).ceil() as i32;
    let y1 = bottom.min(target.height() as f32).ceil() as i32;
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(target, x, y, color, 1.0);
        }
    }
}

/// Blend a rounded rectangle. The radius is clamped to half the smaller side.
pub fn fill_rounded_rect(target: &mut RgbaImage, rect: Rect, radius: u32, color: Rgba<u8>) {
    let radius = radius.min(rect.width / 2).min(rect.height / 2);
    let r = radius as f32;
    let (l, t) = (rect.x as f32, rect.y as f32);
    let (rt, b) = (rect.right() as f32, rect.bottom() as f32);

    let y0 = rect.y.max(0);
    let y1 = rect.bottom().min(target.height() as i32);
    let x0 = rect.x.max(0);
    let x1 = rect.right().min(target.width() as i32);
    for py in y0..y1 {
        let cy = py as f32 + 0.5;
        let dy = if cy < t + r {
            t + r - cy
        } else if cy > b - r {
            cy - (b - r)
        } else {
            0.0
        };
        for px in x0..x1 {
            let cx = px as f32 + 0.5;
            let dx = if cx < l + r {
                l + r - cx
            } else if cx > rt - r {
                cx - (rt - r)
            } else {
                0.0
            };
            if dx * dx + dy * dy <= r * r {
                blend_pixel(target, px, py, color, 1.0);
            }
        }
    }
}

/// Execute a display list onto a fresh transparent overlay.
pub fn rasterize(commands: &[PaintCommand], width: u32, height: u32, fonts: &FontSet) -> RgbaImage {
    let mut overlay = RgbaImage::new(width, height);
    for cmd in commands {
        match cmd {
            PaintCommand::RoundedRect { rect, radius, rgba } => {
                fill_rounded_rect(&mut overlay, *rect, *radius, Rgba(*rgba))
            }
            PaintCommand::Image { x, y, image } => {
                imageops::replace(&mut overlay, image, *x as i64, *y as i64)
            }
            PaintCommand::Text {
                x,
                y,
                text,
                role,
                size,
                rgba,
            } => fonts
                .get(*role)
                .draw(&mut overlay, text, *x, *y, *size, Rgba(*rgba)),
        }
    }
    overlay
}

/// Porter-Duff "over" of `overlay` onto `background`. The overlay is
/// clipped to the background.
pub fn alpha_composite(background: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut out = background.clone();
    imageops::overlay(&mut out, overlay, 0, 0);
    out
}

/// Drop the alpha channel by blending every pixel over a solid fill.
pub fn flatten(image: &RgbaImage, fill: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y).0;
        let a = p[3] as f32 / 255.0;
        let mut out = [0u8; 3];
        for i in 0..3 {
            out[i] = (p[i] as f32 * a + fill.0[i] as f32 * (1.0 - a)).round() as u8;
        }
        Rgb(out)
    })
}
