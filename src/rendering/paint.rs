//! Display list for one gallery page
//!
//! Painting never touches pixels. It turns items and a [`ScaledGrid`] into an
//! ordered list of [`PaintCommand`]s which the rasterizer then executes onto a
//! transparent overlay.

use crate::config::{GalleryStyle, LayoutBudget};
use crate::rendering::cover;
use crate::rendering::font::{FontRole, FontSet};
use crate::rendering::layout::{Rect, ScaledGrid};
use crate::rendering::text::{truncate_text, wrap_title};
use crate::GalleryItem;
use image::{Rgb, RgbaImage};
use log::warn;

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    RoundedRect {
        rect: Rect,
        radius: u32,
        rgba: [u8; 4],
    },
    /// Opaque pixels copied as-is, clipped to the canvas
    Image {
        x: i32,
        y: i32,
        image: RgbaImage,
    },
    /// Text with its top-left corner at `(x, y)`
    Text {
        x: f32,
        y: f32,
        text: String,
        role: FontRole,
        size: f32,
        rgba: [u8; 4],
    },
}

/// Builds the display list of a page from a budget, a style and fonts.
pub struct GalleryPainter<'a> {
    pub budget: &'a LayoutBudget,
    pub style: &'a GalleryStyle,
    pub fonts: &'a FontSet,
}

impl<'a> GalleryPainter<'a> {
    pub fn new(budget: &'a LayoutBudget, style: &'a GalleryStyle, fonts: &'a FontSet) -> Self {
        Self { budget, style, fonts }
    }

    /// Panel, every item, then the page label, in painting order.
    pub fn paint_page(
        &self,
        items: &[GalleryItem],
        grid: &ScaledGrid,
        page_label: &str,
        canvas: (u32, u32),
    ) -> Vec<PaintCommand> {
        let mut out = Vec::with_capacity(2 + items.len() * 8);
        out.push(self.grid_panel());
        for (index, item) in items.iter().enumerate() {
            self.paint_item(&mut out, index, item, grid);
        }
        out.push(self.page_label(page_label, canvas));
        out
    }

    /// Translucent panel behind the whole content area.
    pub fn grid_panel(&self) -> PaintCommand {
        let (ox, oy) = self.budget.content_origin();
        let (cw, ch) = self.budget.content_size();
        PaintCommand::RoundedRect {
            rect: Rect::new(ox as i32, oy as i32, cw, ch).outset(self.style.panel_outset),
            radius: self.style.panel_radius,
            rgba: self.style.panel_rgba,
        }
    }

    /// Card, ordinal, cover and the text column of the item at `index`.
    pub fn paint_item(
        &self,
        out: &mut Vec<PaintCommand>,
        index: usize,
        item: &GalleryItem,
        grid: &ScaledGrid,
    ) {
        let rect = grid.item_rect(index);
        out.push(PaintCommand::RoundedRect {
            rect: rect.outset(self.style.card_outset),
            radius: self.style.card_radius,
            rgba: self.style.card_rgba,
        });

        if self.style.draw_ordinals {
            out.push(self.ordinal(index, rect, grid));
        }

        let cover_box = grid.cover_rect(index);
        match cover::prepare_cover(item.cover(), cover_box.width, cover_box.height) {
            Ok(image) => out.push(PaintCommand::Image {
                x: cover_box.x,
                y: cover_box.y,
                image,
            }),
            Err(e) => {
                warn!("Cover for {} replaced by placeholder: {}", item.identifier(), e);
                self.placeholder(out, cover_box, grid);
            }
        }

        let (text_x, text_y) = grid.text_origin(index);
        let max_width = grid.text_max_width();
        let text_x = text_x as f32;
        let mut cur_y = text_y as f32;

        out.push(PaintCommand::Text {
            x: text_x,
            y: cur_y,
            text: item.identifier().to_string(),
            role: FontRole::Identifier,
            size: grid.id_font_size,
            rgba: self.style.id_rgba,
        });
        cur_y += grid.id_font_size + grid.scaled(20) as f32;

        let title_face = self.fonts.get(FontRole::Title);
        let lines = wrap_title(
            title_face,
            grid.title_font_size,
            item.title(),
            max_width,
            self.budget.title_max_lines,
        );
        for line in lines {
            out.push(PaintCommand::Text {
                x: text_x,
                y: cur_y,
                text: line,
                role: FontRole::Title,
                size: grid.title_font_size,
                rgba: self.style.title_rgba,
            });
            cur_y += grid.title_font_size * 2.0;
        }
        cur_y += grid.scaled(5) as f32;

        let tags = item.display_tags(&self.style.tag_separator, &self.style.empty_tags_label);
        let tags = truncate_text(
            self.fonts.get(FontRole::Tags),
            grid.tags_font_size,
            &tags,
            max_width,
        );
        out.push(PaintCommand::Text {
            x: text_x,
            y: cur_y,
            text: tags,
            role: FontRole::Tags,
            size: grid.tags_font_size,
            rgba: self.style.tags_rgba,
        });
    }

    // 1-based index, right-aligned and vertically centred in the item.
    fn ordinal(&self, index: usize, rect: Rect, grid: &ScaledGrid) -> PaintCommand {
        let text = (index + 1).to_string();
        let size = grid.ordinal_font_size;
        let face = self.fonts.get(FontRole::Ordinal);
        let width = face.measure(&text, size);
        let x = (rect.right() - grid.scaled(15)) as f32 - width;
        let y = rect.y as f32 + (rect.height as f32 - face.line_height(size)) / 2.0;
        PaintCommand::Text {
            x,
            y,
            text,
            role: FontRole::Ordinal,
            size,
            rgba: self.style.ordinal_rgba,
        }
    }

    fn placeholder(&self, out: &mut Vec<PaintCommand>, cover_box: Rect, grid: &ScaledGrid) {
        out.push(PaintCommand::Image {
            x: cover_box.x,
            y: cover_box.y,
            image: cover::placeholder(
                cover_box.width,
                cover_box.height,
                Rgb(self.style.placeholder_rgb),
            ),
        });

        let caption = &self.style.placeholder_caption;
        if caption.is_empty() {
            return;
        }
        let face = self.fonts.get(FontRole::Tags);
        let size = grid.tags_font_size;
        let caption = truncate_text(face, size, caption, cover_box.width as f32);
        let width = face.measure(&caption, size);
        out.push(PaintCommand::Text {
            x: cover_box.x as f32 + (cover_box.width as f32 - width) / 2.0,
            y: cover_box.y as f32 + (cover_box.height as f32 - face.line_height(size)) / 2.0,
            text: caption,
            role: FontRole::Tags,
            size,
            rgba: WHITE,
        });
    }

    /// Page label centred in the footer strip.
    pub fn page_label(&self, label: &str, canvas: (u32, u32)) -> PaintCommand {
        let (canvas_w, canvas_h) = canvas;
        let size = self.budget.page_font_size;
        let width = self.fonts.get(FontRole::Page).measure(label, size);
        let footer = self.budget.footer_height as f32;
        PaintCommand::Text {
            x: ((canvas_w as f32 - width) / 2.0).floor(),
            y: canvas_h as f32 - footer + ((footer - size) / 2.0).floor() + 10.0,
            text: label.to_string(),
            role: FontRole::Page,
            size,
            rgba: self.style.page_rgba,
        }
    }
}
