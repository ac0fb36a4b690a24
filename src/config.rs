//! Configuration for the gallery renderer
//!
//! Every tunable the renderer uses lives here and is passed in explicitly.
//! All structs deserialize from JSON with per-field defaults, so a config
//! file only needs to name the values it overrides.

use crate::rendering::layout::GridConstraints;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base (scale 1.0) pixel dimensions and grid caps for one gallery page.
///
/// The canvas is a fixed size derived from the largest grid the caps allow;
/// the layout search then scales the base sizes to fill it.
///
/// # Examples
///
/// ```
/// let budget = mangagrid::LayoutBudget::default();
/// assert_eq!(budget.item_width(), 650);
/// assert_eq!(budget.content_size(), (2750, 4570));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutBudget {
    /// Cover box width at scale 1.0
    pub cover_width: u32,
    /// Cover box height at scale 1.0 (also the item height)
    pub cover_height: u32,
    /// Width of the text column to the right of the cover
    pub text_area_width: u32,
    /// Horizontal gap between columns
    pub column_spacing: u32,
    /// Vertical gap between rows
    pub row_spacing: u32,
    /// Outer padding around the content area
    pub padding: u32,
    /// Height of the page-label strip below the content area
    pub footer_height: u32,
    /// Height of the optional profile strip above the content area
    pub header_height: u32,
    /// Maximum number of columns
    pub max_columns: u32,
    /// Maximum number of rows in one column
    pub max_rows_per_column: u32,
    pub id_font_size: f32,
    pub title_font_size: f32,
    pub tags_font_size: f32,
    /// Page label size; not scaled with the grid
    pub page_font_size: f32,
    /// Maximum number of wrapped title lines per item
    pub title_max_lines: usize,
}

impl Default for LayoutBudget {
    fn default() -> Self {
        Self {
            cover_width: 150,
            cover_height: 200,
            text_area_width: 500,
            column_spacing: 50,
            row_spacing: 30,
            padding: 100,
            footer_height: 120,
            header_height: 0,
            max_columns: 4,
            max_rows_per_column: 20,
            id_font_size: 36.0,
            title_font_size: 20.0,
            tags_font_size: 22.0,
            page_font_size: 97.0,
            title_max_lines: 2,
        }
    }
}

impl LayoutBudget {
    pub fn item_width(&self) -> u32 {
        self.cover_width + self.text_area_width
    }

    pub fn item_height(&self) -> u32 {
        self.cover_height
    }

    /// Footprint of a full `max_columns × max_rows_per_column` grid at scale 1.0.
    pub fn content_size(&self) -> (u32, u32) {
        let cols = self.max_columns;
        let rows = self.max_rows_per_column;
        let w = self.item_width() * cols + self.column_spacing * cols.saturating_sub(1);
        let h = self.item_height() * rows + self.row_spacing * rows.saturating_sub(1);
        (w, h)
    }

    /// Full canvas: content plus padding, header and footer strips.
    pub fn canvas_size(&self) -> (u32, u32) {
        let (cw, ch) = self.content_size();
        (
            cw + 2 * self.padding,
            self.header_height + self.padding + ch + self.footer_height,
        )
    }

    /// Top-left corner of the content area on the canvas.
    pub fn content_origin(&self) -> (u32, u32) {
        (self.padding, self.header_height + self.padding)
    }

    /// Inputs for [`choose_layout`](crate::rendering::layout::choose_layout).
    pub fn grid_constraints(&self) -> GridConstraints {
        let (cw, ch) = self.content_size();
        GridConstraints {
            max_columns: self.max_columns,
            max_rows_per_column: self.max_rows_per_column,
            item_width: self.item_width() as f64,
            item_height: self.item_height() as f64,
            column_spacing: self.column_spacing as f64,
            row_spacing: self.row_spacing as f64,
            content_width: cw as f64,
            content_height: ch as f64,
        }
    }
}

/// Colours, radii and labels used when painting a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryStyle {
    pub panel_rgba: [u8; 4],
    pub panel_radius: u32,
    /// How far the grid panel extends past the content area
    pub panel_outset: u32,
    pub card_rgba: [u8; 4],
    pub card_radius: u32,
    pub card_outset: u32,
    pub ordinal_rgba: [u8; 4],
    pub draw_ordinals: bool,
    pub id_rgba: [u8; 4],
    pub title_rgba: [u8; 4],
    pub tags_rgba: [u8; 4],
    pub page_rgba: [u8; 4],
    pub header_rgba: [u8; 4],
    pub placeholder_rgb: [u8; 3],
    pub placeholder_caption: String,
    pub avatar_placeholder_rgb: [u8; 3],
    /// Solid fill any residual transparency is flattened against
    pub flatten_rgb: [u8; 3],
    pub tag_separator: String,
    pub empty_tags_label: String,
}

impl Default for GalleryStyle {
    fn default() -> Self {
        Self {
            panel_rgba: [0, 0, 0, 20],
            panel_radius: 30,
            panel_outset: 25,
            card_rgba: [0, 0, 0, 30],
            card_radius: 20,
            card_outset: 10,
            ordinal_rgba: [0, 0, 0, 70],
            draw_ordinals: true,
            id_rgba: [0, 123, 255, 255],
            title_rgba: [0, 0, 0, 255],
            tags_rgba: [20, 90, 180, 255],
            page_rgba: [10, 115, 212, 255],
            header_rgba: [0, 0, 0, 255],
            placeholder_rgb: [255, 80, 80],
            placeholder_caption: "Cover Failed".to_string(),
            avatar_placeholder_rgb: [200, 200, 200],
            flatten_rgb: [255, 255, 255],
            tag_separator: " / ".to_string(),
            empty_tags_label: "no tags".to_string(),
        }
    }
}

/// Optional asset files; missing or broken ones fall back to built-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Font for identifiers, titles, tags and ordinals
    pub text_font: Option<PathBuf>,
    /// Font for the page label and profile header
    pub display_font: Option<PathBuf>,
    /// Background image, cover-filled to the canvas size
    pub background: Option<PathBuf>,
}

/// Settings for the cover fetching collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of cover requests in flight
    pub max_concurrent: usize,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Site root used to build album cover URLs
    pub base_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 20,
            timeout_ms: 15000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) mangagrid/0.1".to_string(),
            base_url: None,
        }
    }
}

/// Top-level configuration, loadable from a JSON file.
///
/// # Examples
///
/// ```
/// let cfg: mangagrid::GalleryConfig =
///     serde_json::from_str(r#"{ "budget": { "max_columns": 3 } }"#).unwrap();
/// assert_eq!(cfg.budget.max_columns, 3);
/// assert_eq!(cfg.budget.max_rows_per_column, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub budget: LayoutBudget,
    pub style: GalleryStyle,
    pub assets: AssetPaths,
    pub fetch: FetchConfig,
    /// Directory rendered pages are cached in
    pub cache_dir: PathBuf,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            budget: LayoutBudget::default(),
            style: GalleryStyle::default(),
            assets: AssetPaths::default(),
            fetch: FetchConfig::default(),
            cache_dir: PathBuf::from("resources/image/gallery"),
        }
    }
}

impl GalleryConfig {
    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let cfg: GalleryConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no page could ever be rendered with.
    pub fn validate(&self) -> Result<()> {
        let b = &self.budget;
        if b.max_columns == 0 || b.max_rows_per_column == 0 {
            return Err(Error::Config(
                "max_columns and max_rows_per_column must be at least 1".into(),
            ));
        }
        if b.cover_width == 0 || b.cover_height == 0 {
            return Err(Error::Config("cover size must be non-zero".into()));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(Error::Config("fetch.max_concurrent must be at least 1".into()));
        }
        Ok(())
    }
}
