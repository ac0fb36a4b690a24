//! Rendering pipeline: layout → paint → raster
//!
//! [`GalleryRenderer`] owns everything a page needs that outlives a single
//! call (budget, style, fonts, background) and turns a list of items into a
//! [`RenderedPage`].

pub mod cover;
pub mod font;
pub mod header;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use crate::config::{GalleryConfig, GalleryStyle, LayoutBudget};
use crate::rendering::font::FontSet;
use crate::rendering::layout::{LayoutPlan, ScaledGrid};
use crate::rendering::paint::GalleryPainter;
use crate::{Assets, Error, GalleryItem, ProfileHeader, Result};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Lowest JPEG quality tried by [`RenderedPage::encode_jpeg_within`].
pub const MIN_JPEG_QUALITY: u8 = 10;
const JPEG_QUALITY_STEP: u8 = 5;

/// A finished, fully opaque page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    pub image: RgbImage,
}

impl RenderedPage {
    pub fn new(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| Error::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
            .encode_image(&self.image)
            .map_err(|e| Error::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Encode as JPEG, lowering quality from `start_quality` in steps of 5
    /// until the result is at most `target_kb` KiB. When even the lowest
    /// quality is too large the smallest attempt is returned.
    pub fn encode_jpeg_within(&self, target_kb: usize, start_quality: u8) -> Result<Vec<u8>> {
        let limit = target_kb * 1024;
        let mut quality = start_quality.clamp(MIN_JPEG_QUALITY, 100);
        let mut smallest: Option<Vec<u8>> = None;
        loop {
            let data = self.encode_jpeg(quality)?;
            debug!("JPEG quality {} -> {} bytes", quality, data.len());
            if data.len() <= limit {
                return Ok(data);
            }
            if smallest.as_ref().map_or(true, |s| data.len() < s.len()) {
                smallest = Some(data);
            }
            if quality <= MIN_JPEG_QUALITY {
                break;
            }
            quality = quality.saturating_sub(JPEG_QUALITY_STEP).max(MIN_JPEG_QUALITY);
        }
        smallest.ok_or_else(|| Error::Encode("no JPEG attempt produced output".into()))
    }

    /// PNG bytes as a `base64://` URI for chat upload.
    pub fn to_base64_uri(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!("base64://{}", general_purpose::STANDARD.encode(png)))
    }

    /// Upside-down copy, sent when a platform rejects the original.
    pub fn flipped_vertical(&self) -> Self {
        Self::new(imageops::flip_vertical(&self.image))
    }

    /// Write the page to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.image.save(path).map_err(Error::from)
    }
}

/// Renders gallery pages on a fixed canvas.
#[derive(Debug, Clone)]
pub struct GalleryRenderer {
    budget: LayoutBudget,
    style: GalleryStyle,
    fonts: FontSet,
    background: RgbaImage,
}

impl GalleryRenderer {
    /// `background` is cover-filled to the canvas when its size differs.
    pub fn new(budget: LayoutBudget, style: GalleryStyle, fonts: FontSet, background: RgbaImage) -> Self {
        let (w, h) = budget.canvas_size();
        let background = if background.dimensions() == (w, h) {
            background
        } else {
            cover::fill_box(&background, w, h)
        };
        Self {
            budget,
            style,
            fonts,
            background,
        }
    }

    /// Built-in fonts on a plain white canvas.
    pub fn builtin(budget: LayoutBudget) -> Self {
        let (w, h) = budget.canvas_size();
        Self::new(
            budget,
            GalleryStyle::default(),
            FontSet::builtin(),
            RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])),
        )
    }

    /// Load assets named by `config`, falling back to built-ins.
    pub fn from_config(config: &GalleryConfig) -> Self {
        let assets = Assets::load(&config.assets, config.budget.canvas_size());
        Self::new(
            config.budget.clone(),
            config.style.clone(),
            assets.fonts,
            assets.background,
        )
    }

    pub fn budget(&self) -> &LayoutBudget {
        &self.budget
    }

    pub fn style(&self) -> &GalleryStyle {
        &self.style
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.budget.canvas_size()
    }

    /// Grid shape for `item_count` items under this renderer's caps.
    pub fn choose_layout(&self, item_count: usize) -> Result<LayoutPlan> {
        let plan = layout::choose_layout(item_count, &self.budget.grid_constraints())?;
        debug!(
            "Layout for {} items: columns={} rows={} scale={:.4}",
            item_count, plan.columns, plan.rows, plan.scale
        );
        Ok(plan)
    }

    /// Render `items` with an already chosen plan.
    ///
    /// An empty item list yields the background alone. Covers that fail to
    /// decode become placeholders; nothing here fails.
    pub fn render_page(
        &self,
        items: &[GalleryItem],
        plan: &LayoutPlan,
        page_label: &str,
        profile: Option<&ProfileHeader>,
    ) -> RenderedPage {
        let canvas = self.canvas_size();
        let fill = Rgb(self.style.flatten_rgb);
        if items.is_empty() {
            return RenderedPage::new(raster::flatten(&self.background, fill));
        }

        let grid = ScaledGrid::new(*plan, &self.budget);
        let painter = GalleryPainter::new(&self.budget, &self.style, &self.fonts);
        let mut commands = match profile {
            Some(h) => header::paint_header(h, &self.budget, &self.style, &self.fonts, canvas.0),
            None => Vec::new(),
        };
        commands.extend(painter.paint_page(items, &grid, page_label, canvas));

        let overlay = raster::rasterize(&commands, canvas.0, canvas.1, &self.fonts);
        let composed = raster::alpha_composite(&self.background, &overlay);
        RenderedPage::new(raster::flatten(&composed, fill))
    }

    /// Choose a layout and render page `page` of `max_page`.
    pub fn render(
        &self,
        items: &[GalleryItem],
        page: u32,
        max_page: u32,
        profile: Option<&ProfileHeader>,
    ) -> Result<RenderedPage> {
        let plan = self.choose_layout(items.len())?;
        Ok(self.render_page(items, &plan, &crate::page_label(page, max_page), profile))
    }
}
