//! TrueType text for titles and legend labels.
//!
//! A configured font file wins, then well-known system fonts, then the
//! DejaVu Sans copy embedded in this crate.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

/// Embedded fallback font, DejaVu Sans (see `assets/DejaVuSans-LICENSE.txt`)
const EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Locations searched when no font path is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font from `configured`, falling back to well-known system fonts
/// and finally the embedded font.
///
/// `None` only when the embedded font cannot be parsed.
pub fn load_font(configured: Option<&Path>) -> Option<Font<'static>> {
    let candidates: Vec<PathBuf> = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_PATHS.iter().map(PathBuf::from))
        .collect();

    for path in &candidates {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match Font::try_from_vec(bytes) {
            Some(font) => {
                debug!(path = %path.display(), "Loaded font");
                return Some(font);
            }
            None => warn!(path = %path.display(), "File is not a usable TrueType font"),
        }
    }

    debug!("No font file found, using embedded DejaVu Sans");
    embedded_font()
}

/// The font compiled into this crate.
pub fn embedded_font() -> Option<Font<'static>> {
    let font = Font::try_from_bytes(EMBEDDED_FONT);
    if font.is_none() {
        warn!("Embedded font is unusable; map text will be omitted");
    }
    font
}

/// Font size in points converted to pixels at `dpi`.
pub fn points_to_px(points: f32, dpi: f32) -> f32 {
    points * dpi / 72.0
}

/// A font paired with a pixel size.
#[derive(Clone, Copy)]
pub struct TextStyle<'f> {
    pub font: &'f Font<'static>,
    pub size_px: f32,
    pub color: [u8; 4],
}

impl<'f> TextStyle<'f> {
    fn scale(&self) -> Scale {
        Scale::uniform(self.size_px)
    }

    /// Width and height in pixels of `text` drawn in this style.
    pub fn measure(&self, text: &str) -> (i32, i32) {
        if text.is_empty() {
            return (0, 0);
        }
        text_size(self.scale(), self.font, text)
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw(&self, image: &mut RgbaImage, x: i32, y: i32, text: &str) {
        draw_text_mut(image, Rgba(self.color), x, y, self.scale(), self.font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_px() {
        assert_eq!(points_to_px(72.0, 300.0), 300.0);
        assert_eq!(points_to_px(12.0, 72.0), 12.0);
    }

    #[test]
    fn test_bad_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"plain text").unwrap();

        let font = load_font(Some(&path)).unwrap();
        assert!(font.glyph_count() > 0);
    }

    #[test]
    fn test_embedded_font_parses() {
        let font = embedded_font().unwrap();
        let style = TextStyle {
            font: &font,
            size_px: 20.0,
            color: [0, 0, 0, 255],
        };
        let (w, h) = style.measure("Opportunity Rankings");
        assert!(w > 100);
        assert!(h > 0);
    }
}
