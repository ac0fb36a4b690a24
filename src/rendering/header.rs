//! Profile strip drawn above the grid on favourites pages

use crate::config::{GalleryStyle, LayoutBudget};
use crate::rendering::cover;
use crate::rendering::font::{FontRole, FontSet};
use crate::rendering::paint::PaintCommand;
use crate::rendering::text::truncate_text;
use crate::ProfileHeader;
use image::Rgb;
use log::{debug, warn};

/// Number of xp-power entries shown next to the profile.
pub const XP_ENTRIES: usize = 3;

/// Paint `header` into the `header_height` strip at the top of the canvas.
/// Returns nothing when the budget reserves no strip.
pub fn paint_header(
    header: &ProfileHeader,
    budget: &LayoutBudget,
    style: &GalleryStyle,
    fonts: &FontSet,
    canvas_width: u32,
) -> Vec<PaintCommand> {
    let h = budget.header_height;
    if h == 0 {
        return Vec::new();
    }
    let hf = h as f32;
    let margin = h / 8;
    let side = h.saturating_sub(2 * margin).max(1);
    let left = budget.padding as i32;

    let mut out = Vec::new();

    let avatar = match header.avatar.as_deref() {
        Some(bytes) => match cover::prepare_cover(Some(bytes), side, side) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("Avatar for {} replaced by placeholder: {}", header.username, e);
                None
            }
        },
        None => {
            debug!("No avatar for {}", header.username);
            None
        }
    };
    let avatar = avatar
        .unwrap_or_else(|| cover::placeholder(side, side, Rgb(style.avatar_placeholder_rgb)));
    out.push(PaintCommand::Image {
        x: left,
        y: margin as i32,
        image: avatar,
    });

    let title_size = (hf * 0.3).floor().max(1.0);
    let line_size = (hf * 0.16).floor().max(1.0);
    let first_line_y = margin as f32 + title_size + hf * 0.05;
    let line_step = line_size * 1.3;

    let text_x = (left + side as i32 + 2 * margin as i32) as f32;
    let xp_x = (canvas_width as f32 * 0.7).floor();
    let profile_width = (xp_x - text_x - margin as f32).max(0.0);
    let face = fonts.get(FontRole::Header);

    let mut text = |x: f32, y: f32, s: String, size: f32, max_w: f32| {
        out.push(PaintCommand::Text {
            x,
            y,
            text: truncate_text(face, size, &s, max_w),
            role: FontRole::Header,
            size,
            rgba: style.header_rgba,
        });
    };

    text(text_x, margin as f32, header.username.clone(), title_size, profile_width);
    let profile_lines = [
        format!("Level {}{}", header.level, header.exp),
        format!("Rank {}", header.appellation),
        format!("J Coins {}", header.jcoins),
    ];
    for (k, line) in profile_lines.into_iter().enumerate() {
        text(text_x, first_line_y + k as f32 * line_step, line, line_size, profile_width);
    }

    let xp_width = (canvas_width as f32 - xp_x - budget.padding as f32).max(0.0);
    text(xp_x, margin as f32, "XP Power".to_string(), title_size, xp_width);
    for (k, (name, value)) in header.top_xp(XP_ENTRIES).into_iter().enumerate() {
        text(
            xp_x,
            first_line_y + k as f32 * line_step,
            format!("{}  {}", name, value),
            line_size,
            xp_width,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_texts(cmds: &[PaintCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn sample() -> ProfileHeader {
        ProfileHeader {
            username: "reader".into(),
            level: 7,
            exp: "(120/500)".into(),
            appellation: "Rookie".into(),
            jcoins: 42,
            xp_power: vec![
                ("a".into(), 3),
                ("b".into(), 9),
                ("c".into(), 3),
                ("d".into(), 1),
            ],
            avatar: None,
        }
    }

    fn avatar_of(header: &ProfileHeader) -> image::RgbaImage {
        let budget = LayoutBudget {
            header_height: 80,
            ..Default::default()
        };
        let cmds = paint_header(header, &budget, &GalleryStyle::default(), &FontSet::builtin(), 2950);
        match &cmds[0] {
            PaintCommand::Image { x, y, image } => {
                assert_eq!((*x, *y), (100, 10));
                image.clone()
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn decoded_avatar_is_fitted_to_square() {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbaImage::from_pixel(30, 90, image::Rgba([0, 0, 255, 255]))
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        let header = ProfileHeader {
            avatar: Some(buf.into_inner()),
            ..sample()
        };
        // 80px strip, 10px margins
        let avatar = avatar_of(&header);
        assert_eq!(avatar.dimensions(), (60, 60));
        assert_eq!(avatar.get_pixel(30, 30).0, [0, 0, 255, 255]);
    }

    #[test]
    fn corrupt_avatar_falls_back_to_grey() {
        let header = ProfileHeader {
            avatar: Some(b"not an image".to_vec()),
            ..sample()
        };
        let avatar = avatar_of(&header);
        assert_eq!(avatar.dimensions(), (60, 60));
        assert!(avatar.pixels().all(|p| p.0 == [200, 200, 200, 255]));
    }

    #[test]
    fn zero_height_strip_paints_nothing() {
        let budget = LayoutBudget::default();
        let cmds = paint_header(&sample(), &budget, &GalleryStyle::default(), &FontSet::builtin(), 2950);
        assert!(cmds.is_empty());
    }

    #[test]
    fn header_lists_profile_and_top_xp() {
        let budget = LayoutBudget {
            header_height: 300,
            ..Default::default()
        };
        let cmds = paint_header(&sample(), &budget, &GalleryStyle::default(), &FontSet::builtin(), 2950);
        let texts = header_texts(&cmds);
        assert_eq!(
            texts,
            vec![
                "reader",
                "Level 7(120/500)",
                "Rank Rookie",
                "J Coins 42",
                "XP Power",
                "b  9",
                "a  3",
                "c  3",
            ]
        );
        match &cmds[0] {
            PaintCommand::Image { image, .. } => {
                assert_eq!(image.dimensions(), (226, 226));
                assert_eq!(image.get_pixel(0, 0).0, [200, 200, 200, 255]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
