//! Fonts and background image, loaded once and shared by every render

use crate::config::AssetPaths;
use crate::rendering::cover;
use crate::rendering::font::{BlockFont, FontFace, FontSet, Typeface};
use crate::{Error, Result};
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Immutable render resources.
#[derive(Debug, Clone)]
pub struct Assets {
    pub fonts: FontSet,
    /// Background already fitted to the canvas size
    pub background: RgbaImage,
}

impl Assets {
    /// Load every configured asset. A missing or broken file is logged and
    /// replaced by the built-in block font or a white canvas; this never fails.
    pub fn load(paths: &AssetPaths, canvas: (u32, u32)) -> Self {
        let text = load_face(paths.text_font.as_deref(), "text");
        let display = load_face(paths.display_font.as_deref(), "display");

        let background = match paths.background.as_deref() {
            Some(path) => match load_background(path, canvas) {
                Ok(img) => {
                    info!("Loaded background {}", path.display());
                    img
                }
                Err(e) => {
                    warn!("Background unavailable, using white canvas: {}", e);
                    white_canvas(canvas)
                }
            },
            None => white_canvas(canvas),
        };

        Self {
            fonts: FontSet::new(text, display),
            background,
        }
    }
}

fn load_face(path: Option<&Path>, role: &str) -> Arc<dyn Typeface> {
    match path {
        Some(p) => match FontFace::from_file(p) {
            Ok(face) => {
                info!("Loaded {} font {}", role, p.display());
                Arc::new(face)
            }
            Err(e) => {
                warn!("Falling back to built-in {} font: {}", role, e);
                Arc::new(BlockFont::default())
            }
        },
        None => {
            debug!("No {} font configured, using built-in", role);
            Arc::new(BlockFont::default())
        }
    }
}

/// Read, decode and cover-fill a background image to `canvas`.
pub fn load_background(path: &Path, canvas: (u32, u32)) -> Result<RgbaImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::AssetLoad(format!("{}: {}", path.display(), e)))?;
    let decoded = cover::decode_image(&bytes)
        .map_err(|e| Error::AssetLoad(format!("{}: {}", path.display(), e)))?;
    Ok(cover::fill_box(&decoded, canvas.0, canvas.1))
}

fn white_canvas(canvas: (u32, u32)) -> RgbaImage {
    RgbaImage::from_pixel(canvas.0, canvas.1, Rgba([255, 255, 255, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_files_fall_back_to_builtins() {
        let paths = AssetPaths {
            text_font: Some(PathBuf::from("/no/such/font.ttf")),
            display_font: None,
            background: Some(PathBuf::from("/no/such/bg.png")),
        };
        let assets = Assets::load(&paths, (4, 3));
        assert_eq!(assets.fonts.text.name(), "builtin-block");
        assert_eq!(assets.background.dimensions(), (4, 3));
        assert!(assets.background.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn background_is_fitted_to_canvas() {
        let dir = std::env::temp_dir().join(format!("mangagrid-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bg.png");
        RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255])).save(&path).unwrap();

        let bg = load_background(&path, (6, 3)).unwrap();
        assert_eq!(bg.dimensions(), (6, 3));
        assert_eq!(bg.get_pixel(3, 1).0[2], 255);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_background_is_an_asset_error() {
        let dir = std::env::temp_dir().join(format!("mangagrid-assets-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bg.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_background(&path, (2, 2)), Err(Error::AssetLoad(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
