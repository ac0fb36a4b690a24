//! Mangagrid gallery renderer
//!
//! Lays out a page of covers, titles and tags on a fixed-size canvas and
//! renders it to a single opaque image ready for chat delivery.
//!
//! # Features
//!
//! - **Layout search**: picks the column count that draws items largest
//! - **Pixel-accurate wrapping**: titles wrap and tags truncate by glyph advance
//! - **Recoverable failures**: broken covers and missing assets degrade to placeholders
//! - **Fetching** (default `fetch` feature): bounded concurrent cover downloads
//!
//! # Example
//!
//! ```
//! use mangagrid::{GalleryItem, GalleryRenderer, LayoutBudget};
//!
//! # fn main() -> mangagrid::Result<()> {
//! let budget = LayoutBudget {
//!     max_columns: 2,
//!     max_rows_per_column: 2,
//!     ..Default::default()
//! };
//! let renderer = GalleryRenderer::builtin(budget);
//! let items = vec![
//!     GalleryItem::new("JM100", "First title"),
//!     GalleryItem::new("JM101", "Second title").with_tags(vec!["tag".into()]),
//! ];
//! let page = renderer.render(&items, 1, 3, None)?;
//! assert_eq!((page.width, page.height), renderer.canvas_size());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{AssetPaths, FetchConfig, GalleryConfig, GalleryStyle, LayoutBudget};

pub mod rendering;
pub use rendering::layout::{choose_layout, GridConstraints, LayoutPlan};
pub use rendering::{GalleryRenderer, RenderedPage};

pub mod assets;
pub use assets::Assets;

pub mod cache;
pub mod search;

// Cover downloads need an HTTP client; everything else works offline.
#[cfg(feature = "fetch")]
pub mod fetch;

// Async-friendly render worker
pub mod async_api;
pub use async_api::RenderWorker;

/// One entry on a gallery page.
///
/// The identifier is fixed at construction. Cover bytes are filled in by a
/// fetcher before rendering; absent or undecodable bytes render as a
/// placeholder panel.
///
/// # Examples
///
/// ```
/// let item = mangagrid::GalleryItem::new("JM350234", "Some title")
///     .with_tags(vec!["a".into(), "b".into()]);
/// assert_eq!(item.display_tags(" / ", "no tags"), "a / b");
/// assert!(item.cover().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    identifier: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_url: Option<String>,
    #[serde(skip)]
    cover: Option<Vec<u8>>,
}

impl GalleryItem {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            tags: Vec::new(),
            cover_url: None,
            cover: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_cover(mut self, bytes: Vec<u8>) -> Self {
        self.cover = Some(bytes);
        self
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    /// Replace (or clear) the cover bytes.
    pub fn set_cover(&mut self, bytes: Option<Vec<u8>>) {
        self.cover = bytes;
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn cover(&self) -> Option<&[u8]> {
        self.cover.as_deref()
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    /// Tags joined by `separator`, or `empty_label` when there are none.
    pub fn display_tags(&self, separator: &str, empty_label: &str) -> String {
        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            empty_label.to_string()
        } else {
            tags.join(separator)
        }
    }
}

/// Account summary shown in the header strip of a favourites page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileHeader {
    pub username: String,
    pub level: u32,
    /// Experience progress, printed right after the level
    pub exp: String,
    pub appellation: String,
    pub jcoins: u64,
    /// `(category, power)` pairs in the order the site lists them
    pub xp_power: Vec<(String, i64)>,
    #[serde(skip)]
    pub avatar: Option<Vec<u8>>,
}

impl ProfileHeader {
    /// The `n` strongest xp categories, highest first. Equal values keep
    /// their listed order.
    pub fn top_xp(&self, n: usize) -> Vec<(&str, i64)> {
        let mut entries: Vec<(&str, i64)> =
            self.xp_power.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

/// Footer text for page `page` of `max_page`.
pub fn page_label(page: u32, max_page: u32) -> String {
    format!("{} / {}", page, max_page)
}
