//! Raster figure: canvas ownership, content tracking and PNG output.
//!
//! Shapes are drawn with tiny-skia as they arrive. Text is queued and drawn
//! last with rusttype, on top of every shape. The saved image is cropped to
//! the drawn content plus a pad, the raster equivalent of a tight bounding box.

use std::path::{Path, PathBuf};

use image::{imageops, Rgba, RgbaImage};
use rusttype::Font;
use tiny_skia::{FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::{debug, info};

use tract_common::{MapError, MapResult};

use crate::png;
use crate::projection::PixelRect;
use crate::text::TextStyle;

/// Queued text item.
#[derive(Debug, Clone)]
struct TextItem {
    text: String,
    x: i32,
    y: i32,
    size_px: f32,
    color: [u8; 4],
}

/// Result of writing a figure to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

/// A drawing canvas at a fixed resolution.
///
/// The canvas is released when the figure is dropped, whether or not it was
/// saved.
pub struct Figure {
    pixmap: Pixmap,
    dpi: u32,
    font: Option<Font<'static>>,
    texts: Vec<TextItem>,
    content: Option<PixelRect>,
}

impl Figure {
    /// White canvas of `width` × `height` pixels.
    pub fn new(width: u32, height: u32, dpi: u32, font: Option<Font<'static>>) -> MapResult<Self> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| MapError::Render(format!("Cannot allocate {}x{} canvas", width, height)))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        debug!(width = width, height = height, dpi = dpi, "Allocated figure canvas");

        Ok(Self {
            pixmap,
            dpi,
            font,
            texts: Vec::new(),
            content: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Points to pixels at this figure's resolution.
    pub fn pt(&self, points: f32) -> f32 {
        crate::text::points_to_px(points, self.dpi as f32)
    }

    /// Record `rect` as drawn content for cropping.
    pub fn mark_content(&mut self, rect: PixelRect) {
        self.content = Some(match self.content {
            Some(existing) => existing.union(&rect),
            None => rect,
        });
    }

    /// Extent of everything drawn so far.
    pub fn content_bounds(&self) -> Option<PixelRect> {
        self.content
    }

    /// Fill a path using the even-odd rule, so inner rings become holes.
    pub fn fill_path(&mut self, path: &SkPath, color: (u8, u8, u8, u8)) {
        let paint = paint_for(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::EvenOdd, Transform::identity(), None);
    }

    pub fn stroke_path(&mut self, path: &SkPath, color: (u8, u8, u8, u8), width_px: f32) {
        if width_px <= 0.0 {
            return;
        }
        let paint = paint_for(color);
        let stroke = Stroke {
            width: width_px,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fill an axis-aligned rectangle and mark it as content.
    pub fn fill_rect(&mut self, rect: PixelRect, color: (u8, u8, u8, u8)) {
        if let Some(r) = Rect::from_ltrb(rect.x0, rect.y0, rect.x1, rect.y1) {
            self.pixmap
                .fill_rect(r, &paint_for(color), Transform::identity(), None);
            self.mark_content(rect);
        }
    }

    /// Stroke the outline of a rectangle.
    pub fn stroke_rect(&mut self, rect: PixelRect, color: (u8, u8, u8, u8), width_px: f32) {
        if let Some(r) = Rect::from_ltrb(rect.x0, rect.y0, rect.x1, rect.y1) {
            let path = PathBuilder::from_rect(r);
            self.stroke_path(&path, color, width_px);
            self.mark_content(rect.expand(width_px / 2.0));
        }
    }

    /// Size in pixels of `text` at `size_px`, zero without a font.
    pub fn measure_text(&self, text: &str, size_px: f32) -> (f32, f32) {
        match &self.font {
            Some(font) => {
                let (w, h) = TextStyle {
                    font,
                    size_px,
                    color: [0, 0, 0, 255],
                }
                .measure(text);
                (w.max(0) as f32, h.max(0) as f32)
            }
            None => (0.0, 0.0),
        }
    }

    /// Queue `text` with its top-left corner at (x, y).
    ///
    /// Does nothing without a font.
    pub fn text(&mut self, text: &str, x: f32, y: f32, size_px: f32, color: [u8; 4]) {
        if self.font.is_none() || text.is_empty() {
            return;
        }
        let (w, h) = self.measure_text(text, size_px);
        self.mark_content(PixelRect::from_size(x, y, w, h));
        self.texts.push(TextItem {
            text: text.to_string(),
            x: x.round() as i32,
            y: y.round() as i32,
            size_px,
            color,
        });
    }

    /// Flatten shapes and text into a straight-alpha image.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }

        if let Some(font) = &self.font {
            for item in &self.texts {
                TextStyle {
                    font,
                    size_px: item.size_px,
                    color: item.color,
                }
                .draw(&mut image, item.x, item.y, &item.text);
            }
        }

        image
    }

    /// Crop window for the drawn content grown by `pad_px`, clamped to the canvas.
    pub fn crop_window(&self, pad_px: f32) -> (u32, u32, u32, u32) {
        let canvas = PixelRect::new(0.0, 0.0, self.width() as f32, self.height() as f32);
        let Some(content) = self.content else {
            return (0, 0, self.width(), self.height());
        };

        let padded = content.expand(pad_px);
        let x0 = (padded.x0.floor().max(canvas.x0) as u32).min(self.width() - 1);
        let y0 = (padded.y0.floor().max(canvas.y0) as u32).min(self.height() - 1);
        let x1 = (padded.x1.ceil().min(canvas.x1) as u32).max(x0 + 1);
        let y1 = (padded.y1.ceil().min(canvas.y1) as u32).max(y0 + 1);
        (x0, y0, x1 - x0, y1 - y0)
    }

    /// Encode the tightly cropped figure as PNG.
    pub fn encode_png(&self, pad_in: f32) -> MapResult<(Vec<u8>, u32, u32)> {
        let image = self.to_image();
        let (x, y, w, h) = self.crop_window(pad_in * self.dpi as f32);
        let cropped = imageops::crop_imm(&image, x, y, w, h).to_image();

        let bytes = png::create_png_auto(cropped.as_raw(), w as usize, h as usize, Some(self.dpi))
            .map_err(MapError::Render)?;
        Ok((bytes, w, h))
    }

    /// Write the tightly cropped figure to `path`, creating parent directories.
    pub fn save_png(&self, path: impl AsRef<Path>, pad_in: f32) -> MapResult<SavedImage> {
        let path = path.as_ref();
        let (bytes, width, height) = self.encode_png(pad_in)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;

        info!(
            path = %path.display(),
            width = width,
            height = height,
            dpi = self.dpi,
            bytes = bytes.len(),
            "Saved map image"
        );

        Ok(SavedImage {
            path: path.to_path_buf(),
            width,
            height,
            dpi: self.dpi,
        })
    }
}

impl Drop for Figure {
    fn drop(&mut self) {
        debug!(
            width = self.pixmap.width(),
            height = self.pixmap.height(),
            "Released figure canvas"
        );
    }
}

fn paint_for(color: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, color.3);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_figure_is_white() {
        let figure = Figure::new(4, 3, 72, None).unwrap();
        let image = figure.to_image();
        assert_eq!(image.dimensions(), (4, 3));
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_crop_window_follows_content() {
        let mut figure = Figure::new(100, 80, 72, None).unwrap();
        figure.fill_rect(PixelRect::new(20.0, 30.0, 40.0, 50.0), (255, 0, 0, 255));

        assert_eq!(figure.crop_window(0.0), (20, 30, 20, 20));
        assert_eq!(figure.crop_window(5.0), (15, 25, 30, 30));
        // Pad never leaves the canvas
        assert_eq!(figure.crop_window(100.0), (0, 0, 100, 80));
    }

    #[test]
    fn test_crop_without_content_keeps_canvas() {
        let figure = Figure::new(10, 10, 72, None).unwrap();
        assert_eq!(figure.crop_window(2.0), (0, 0, 10, 10));
    }

    #[test]
    fn test_text_skipped_without_font() {
        let mut figure = Figure::new(10, 10, 72, None).unwrap();
        figure.text("Title", 1.0, 1.0, 12.0, [0, 0, 0, 255]);
        assert!(figure.content_bounds().is_none());
        assert_eq!(figure.measure_text("Title", 12.0), (0.0, 0.0));
    }

    #[test]
    fn test_zero_size_canvas_is_error() {
        assert!(matches!(Figure::new(0, 10, 72, None), Err(MapError::Render(_))));
    }
}
