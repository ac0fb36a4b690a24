//! Cover decoding and scale-to-cover fitting
//!
//! A cover is scaled uniformly until it covers the target box, then the
//! overflow on one axis is cropped away evenly from both sides. Covers are
//! never stretched.

use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, Rgba, RgbaImage};

/// Where a scale-to-cover fit lands: the intermediate resize and the crop
/// offset into it that yields exactly the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    pub resize_to: (u32, u32),
    pub crop_offset: (u32, u32),
}

/// Compute the scale-to-cover fit of a `src_w × src_h` image into
/// `dst_w × dst_h`. All dimensions must be non-zero.
pub fn cover_fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CoverFit {
    // Cross-multiplication keeps exact aspect matches out of float rounding.
    let src_cross = src_w as u64 * dst_h as u64;
    let dst_cross = src_h as u64 * dst_w as u64;
    if src_cross > dst_cross {
        // Source is wider: match heights, crop width.
        let scaled_w = ((src_w as f64 * dst_h as f64 / src_h as f64) as u32).max(dst_w);
        CoverFit {
            resize_to: (scaled_w, dst_h),
            crop_offset: ((scaled_w - dst_w) / 2, 0),
        }
    } else {
        let scaled_h = ((src_h as f64 * dst_w as f64 / src_w as f64) as u32).max(dst_h);
        CoverFit {
            resize_to: (dst_w, scaled_h),
            crop_offset: (0, (scaled_h - dst_h) / 2),
        }
    }
}

/// Scale `image` to cover `width × height` and center-crop the overflow.
pub fn fill_box(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(width, height);
    }
    let fit = cover_fit(image.width(), image.height(), width, height);
    let resized = if fit.resize_to == image.dimensions() {
        image.clone()
    } else {
        imageops::resize(image, fit.resize_to.0, fit.resize_to.1, FilterType::Lanczos3)
    };
    imageops::crop_imm(&resized, fit.crop_offset.0, fit.crop_offset.1, width, height).to_image()
}

/// Decode raw cover bytes in any enabled format.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty image data".into()));
    }
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a cover and fit it to the box. Absent bytes are a decode failure.
pub fn prepare_cover(bytes: Option<&[u8]>, width: u32, height: u32) -> Result<RgbaImage> {
    let bytes = bytes.ok_or_else(|| Error::Decode("cover was not fetched".into()))?;
    let decoded = decode_image(bytes)?;
    Ok(fill_box(&decoded, width, height))
}

/// Opaque solid panel used in place of a cover that failed to decode.
pub fn placeholder(width: u32, height: u32, rgb: Rgb<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([rgb.0[0], rgb.0[1], rgb.0[2], 255]))
}
