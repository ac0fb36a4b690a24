//! Grid layout search and item placement
//!
//! `choose_layout` scans the allowed column counts and keeps the grid shape
//! that lets items be drawn largest on the fixed canvas. `ScaledGrid` turns the
//! winning plan into pixel geometry: scaled item sizes, font sizes and a
//! centred, column-major cell position for every item.

use crate::config::LayoutBudget;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Grow the rect by `by` pixels on every side.
    pub fn outset(&self, by: u32) -> Self {
        Self {
            x: self.x - by as i32,
            y: self.y - by as i32,
            width: self.width + 2 * by,
            height: self.height + 2 * by,
        }
    }
}

/// Inputs to the layout search, all in unscaled (base) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConstraints {
    pub max_columns: u32,
    pub max_rows_per_column: u32,
    pub item_width: f64,
    pub item_height: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub content_width: f64,
    pub content_height: f64,
}

/// Chosen grid shape and the uniform scale applied to every base dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlan {
    pub columns: u32,
    pub rows: u32,
    pub scale: f64,
}

impl LayoutPlan {
    /// Plan used for an empty page.
    pub fn degenerate() -> Self {
        Self {
            columns: 1,
            rows: 1,
            scale: 1.0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.columns * self.rows
    }

    /// `(column, row)` of the item at `index`. Items fill a column top to
    /// bottom before moving to the next column.
    pub fn cell_of(&self, index: usize) -> (u32, u32) {
        let rows = self.rows.max(1) as usize;
        ((index / rows) as u32, (index % rows) as u32)
    }
}

/// Pick the `(columns, rows)` grid that maximizes the scale factor.
///
/// Candidates are scanned in increasing column order and only a strictly
/// larger scale replaces the current best, so exact ties keep the narrower
/// grid. Zero items yield [`LayoutPlan::degenerate`]. Returns
/// [`Error::InvalidLayout`] when the caps or sizes are unusable or no
/// candidate respects `max_rows_per_column`.
pub fn choose_layout(item_count: usize, c: &GridConstraints) -> Result<LayoutPlan> {
    if c.max_columns < 1 || c.max_rows_per_column < 1 {
        return Err(Error::InvalidLayout(format!(
            "max_columns ({}) and max_rows_per_column ({}) must be at least 1",
            c.max_columns, c.max_rows_per_column
        )));
    }
    let sizes = [c.item_width, c.item_height, c.content_width, c.content_height];
    if sizes.iter().any(|v| !(*v > 0.0)) || c.column_spacing < 0.0 || c.row_spacing < 0.0 {
        return Err(Error::InvalidLayout(
            "item and content sizes must be positive".into(),
        ));
    }

    if item_count == 0 {
        return Ok(LayoutPlan::degenerate());
    }

    let mut best: Option<LayoutPlan> = None;
    for columns in 1..=c.max_columns {
        if columns as usize > item_count {
            break;
        }
        let rows = item_count.div_ceil(columns as usize);
        if rows > c.max_rows_per_column as usize {
            continue;
        }
        let rows = rows as u32;

        let unscaled_w = c.item_width * columns as f64 + c.column_spacing * (columns - 1) as f64;
        let unscaled_h = c.item_height * rows as f64 + c.row_spacing * (rows - 1) as f64;
        let scale = (c.content_width / unscaled_w).min(c.content_height / unscaled_h);

        if best.map_or(true, |b| scale > b.scale) {
            best = Some(LayoutPlan {
                columns,
                rows,
                scale,
            });
        }
    }

    best.ok_or_else(|| {
        Error::InvalidLayout(format!(
            "{} items need more than {} rows in each of {} columns",
            item_count, c.max_rows_per_column, c.max_columns
        ))
    })
}

/// Pixel geometry of a plan applied to a budget.
///
/// Scaled values are truncated to whole pixels. The scaled grid is centred
/// inside the canvas content area.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledGrid {
    pub plan: LayoutPlan,
    pub cover_width: u32,
    pub cover_height: u32,
    pub text_area_width: u32,
    pub item_width: u32,
    pub item_height: u32,
    pub column_spacing: u32,
    pub row_spacing: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub id_font_size: f32,
    pub title_font_size: f32,
    pub tags_font_size: f32,
    pub ordinal_font_size: f32,
}

impl ScaledGrid {
    pub fn new(plan: LayoutPlan, budget: &LayoutBudget) -> Self {
        let s = plan.scale;
        let px = |v: u32| (v as f64 * s) as u32;
        let font = |v: f32| ((v as f64 * s) as u32).max(1) as f32;

        let cover_width = px(budget.cover_width);
        let cover_height = px(budget.cover_height);
        let text_area_width = px(budget.text_area_width);
        let item_width = cover_width + text_area_width;
        let item_height = cover_height;
        let column_spacing = px(budget.column_spacing);
        let row_spacing = px(budget.row_spacing);

        let cols = plan.columns;
        let rows = plan.rows;
        let scaled_w = item_width * cols + column_spacing * cols.saturating_sub(1);
        let scaled_h = item_height * rows + row_spacing * rows.saturating_sub(1);

        let (content_w, content_h) = budget.content_size();
        let (ox, oy) = budget.content_origin();
        let origin_x = ox as i32 + (content_w as i64 - scaled_w as i64).div_euclid(2) as i32;
        let origin_y = oy as i32 + (content_h as i64 - scaled_h as i64).div_euclid(2) as i32;

        Self {
            plan,
            cover_width,
            cover_height,
            text_area_width,
            item_width,
            item_height,
            column_spacing,
            row_spacing,
            origin_x,
            origin_y,
            id_font_size: font(budget.id_font_size),
            title_font_size: font(budget.title_font_size),
            tags_font_size: font(budget.tags_font_size),
            ordinal_font_size: ((item_height as f64 * 0.85) as u32).max(1) as f32,
        }
    }

    /// A base offset (e.g. a text inset) in scaled pixels.
    pub fn scaled(&self, v: u32) -> i32 {
        (v as f64 * self.plan.scale) as i32
    }

    /// Bounding box of the item at `index` (cover plus text column).
    pub fn item_rect(&self, index: usize) -> Rect {
        let (col, row) = self.plan.cell_of(index);
        let x = self.origin_x + (col * (self.item_width + self.column_spacing)) as i32;
        let y = self.origin_y + (row * (self.item_height + self.row_spacing)) as i32;
        Rect::new(x, y, self.item_width, self.item_height)
    }

    pub fn cover_rect(&self, index: usize) -> Rect {
        let item = self.item_rect(index);
        Rect::new(item.x, item.y, self.cover_width, self.cover_height)
    }

    /// Left edge and first baseline-free top of the text column.
    pub fn text_origin(&self, index: usize) -> (i32, i32) {
        let item = self.item_rect(index);
        (
            item.x + self.cover_width as i32 + self.scaled(20),
            item.y + self.scaled(15),
        )
    }

    /// Width available to identifier, title and tag lines.
    pub fn text_max_width(&self) -> f32 {
        (self.text_area_width as i32 - self.scaled(40)).max(0) as f32
    }
}
