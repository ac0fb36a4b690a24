//! Glyph metrics and text drawing
//!
//! Text width is always the sum of per-character advances at the requested
//! size. No kerning or shaping is applied, so wrap points depend only on the
//! advance table of the active face.

use crate::rendering::raster;
use crate::{Error, Result};
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::Arc;

/// A face that can measure and draw text at an arbitrary pixel size.
pub trait Typeface: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &str;

    /// Horizontal advance of one character at `size` pixels per em.
    fn advance(&self, ch: char, size: f32) -> f32;

    /// Distance from the top of a text line to its baseline.
    fn ascent(&self, size: f32) -> f32;

    /// Distance from the ascender line to the descender line.
    fn line_height(&self, size: f32) -> f32;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, target: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Rgba<u8>);

    /// Width of `text`, summed character by character.
    fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.advance(c, size)).sum()
    }
}

/// A TrueType/OpenType face (collections use their first face).
#[derive(Clone)]
pub struct FontFace {
    name: String,
    font: FontArc,
}

impl FontFace {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let font = FontArc::try_from_vec(data)
            .map_err(|e| Error::AssetLoad(format!("{}: {}", name, e)))?;
        Ok(Self { name, font })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::AssetLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(path.display().to_string(), data)
    }

    // `size` is pixels per em; ab_glyph scales by ascent-to-descent height.
    fn px_scale(&self, size: f32) -> PxScale {
        match self.font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(size * self.font.height_unscaled() / upem),
            _ => PxScale::from(size),
        }
    }
}

impl Typeface for FontFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        let scaled = self.font.as_scaled(self.px_scale(size));
        scaled.h_advance(scaled.glyph_id(ch))
    }

    fn ascent(&self, size: f32) -> f32 {
        self.font.as_scaled(self.px_scale(size)).ascent()
    }

    fn line_height(&self, size: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(size));
        scaled.ascent() - scaled.descent()
    }

    fn draw(&self, target: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Rgba<u8>) {
        let scaled = self.font.as_scaled(self.px_scale(size));
        let baseline = y + scaled.ascent();
        let mut cursor = x;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let id = scaled.glyph_id(ch);
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = point(cursor, baseline);
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, coverage| {
                    raster::blend_pixel(
                        target,
                        bounds.min.x as i32 + gx as i32,
                        bounds.min.y as i32 + gy as i32,
                        color,
                        coverage,
                    );
                });
            }
            cursor += scaled.h_advance(id);
        }
    }
}

/// Built-in fallback face: every printable character advances by
/// `advance_ratio × size` and is drawn as a solid block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockFont {
    advance_ratio: f32,
}

impl BlockFont {
    pub const fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Typeface for BlockFont {
    fn name(&self) -> &str {
        "builtin-block"
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        if ch.is_control() {
            0.0
        } else {
            size * self.advance_ratio
        }
    }

    fn ascent(&self, size: f32) -> f32 {
        size * 0.8
    }

    fn line_height(&self, size: f32) -> f32 {
        size
    }

    fn draw(&self, target: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Rgba<u8>) {
        let mut cursor = x;
        for ch in text.chars() {
            let adv = self.advance(ch, size);
            if !ch.is_whitespace() && adv > 0.0 {
                raster::fill_rect(
                    target,
                    cursor + adv * 0.1,
                    y + size * 0.15,
                    cursor + adv * 0.9,
                    y + size * 0.85,
                    color,
                );
            }
            cursor += adv;
        }
    }
}

/// Which face a piece of text is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Identifier,
    Title,
    Tags,
    Ordinal,
    Page,
    Header,
}

/// The two faces a page uses: a text face for item content and a display
/// face for the page label and profile header.
#[derive(Clone)]
pub struct FontSet {
    pub text: Arc<dyn Typeface>,
    pub display: Arc<dyn Typeface>,
}

impl FontSet {
    pub fn new(text: Arc<dyn Typeface>, display: Arc<dyn Typeface>) -> Self {
        Self { text, display }
    }

    /// Both roles served by [`BlockFont`].
    pub fn builtin() -> Self {
        let block: Arc<dyn Typeface> = Arc::new(BlockFont::default());
        Self::new(block.clone(), block)
    }

    pub fn get(&self, role: FontRole) -> &dyn Typeface {
        match role {
            FontRole::Identifier | FontRole::Title | FontRole::Tags | FontRole::Ordinal => {
                self.text.as_ref()
            }
            FontRole::Page | FontRole::Header => self.display.as_ref(),
        }
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("text", &self.text.name())
            .field("display", &self.display.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_font_measures_per_character() {
        let f = BlockFont::new(0.5);
        assert_eq!(f.advance('A', 20.0), 10.0);
        assert_eq!(f.measure("ABC", 20.0), 30.0);
        assert_eq!(f.measure("A\nB", 20.0), 20.0);
    }

    #[test]
    fn block_font_draws_inside_its_advance() {
        let mut img = RgbaImage::new(40, 20);
        BlockFont::new(0.5).draw(&mut img, "A B", 0.0, 0.0, 20.0, Rgba([0, 0, 0, 255]));
        // 'A' occupies x in [1, 9), the space leaves [10, 20) empty
        assert_eq!(img.get_pixel(5, 10).0[3], 255);
        assert_eq!(img.get_pixel(15, 10).0[3], 0);
        assert_eq!(img.get_pixel(25, 10).0[3], 255);
    }

    #[test]
    fn invalid_font_bytes_are_an_asset_error() {
        let err = FontFace::from_bytes("junk", vec![0, 1, 2, 3]).err().unwrap();
        assert!(matches!(err, Error::AssetLoad(_)));
    }

    #[test]
    fn font_set_routes_roles() {
        let text: Arc<dyn Typeface> = Arc::new(BlockFont::new(0.5));
        let display: Arc<dyn Typeface> = Arc::new(BlockFont::new(1.0));
        let set = FontSet::new(text, display);
        assert_eq!(set.get(FontRole::Title).advance('x', 10.0), 5.0);
        assert_eq!(set.get(FontRole::Page).advance('x', 10.0), 10.0);
    }
}
