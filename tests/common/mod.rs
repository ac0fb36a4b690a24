//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use mangagrid::LayoutBudget;
use std::io::Cursor;

/// A budget small enough to render quickly: items are 130×40 at scale 1
/// and a full 2×2 grid exactly fills the 270×86 content area.
pub fn small_budget() -> LayoutBudget {
    LayoutBudget {
        cover_width: 30,
        cover_height: 40,
        text_area_width: 100,
        column_spacing: 10,
        row_spacing: 6,
        padding: 20,
        footer_height: 30,
        header_height: 0,
        max_columns: 2,
        max_rows_per_column: 2,
        id_font_size: 8.0,
        title_font_size: 6.0,
        tags_font_size: 6.0,
        page_font_size: 20.0,
        title_max_lines: 2,
    }
}

/// PNG bytes of a solid image.
pub fn png_cover(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, Rgba(rgba));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode test cover");
    buf.into_inner()
}
