//! Categorical choropleth maps of census tracts.
//!
//! Layout follows a conventional single-axes figure: the map is fitted inside
//! the axes rectangle, the title sits above it, and the legend is anchored
//! just outside the axes' upper right. The canvas grows to the right when the
//! legend would not otherwise fit; the saved image is cropped to content.

use std::path::PathBuf;

use geo::{LineString, MultiPolygon};
use serde::{Deserialize, Serialize};
use tiny_skia::PathBuilder;
use tracing::{debug, info, instrument};

use tract_common::{BoundingBox, CategoryScheme, GeoId, MapResult};

use crate::figure::Figure;
use crate::legend::{build_legend, Legend};
use crate::projection::{MapProjection, PixelRect};
use crate::text::load_font;

/// Axes rectangle as fractions of the figure (left, top, right, bottom).
const AXES_FRACTIONS: (f32, f32, f32, f32) = (0.125, 0.12, 0.9, 0.89);

/// Legend upper-left corner in axes coordinates (x right, y up).
const LEGEND_ANCHOR: (f32, f32) = (1.1, 0.95);

/// Gap between the title baseline area and the axes top, in points.
const TITLE_GAP_PT: f32 = 6.0;

const TEXT_COLOR: [u8; 4] = [0, 0, 0, 255];
const LEGEND_FRAME_FILL: (u8, u8, u8, u8) = (255, 255, 255, 204);
const LEGEND_FRAME_EDGE: (u8, u8, u8, u8) = (204, 204, 204, 255);

/// One tract to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub geoid: GeoId,
    /// Category value looked up in the scheme
    pub category: String,
    pub geometry: MultiPolygon<f64>,
}

/// Figure size, resolution and text settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width_in")]
    pub width_in: f32,

    #[serde(default = "default_height_in")]
    pub height_in: f32,

    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Space kept around the cropped content, in inches
    #[serde(default = "default_pad_in")]
    pub pad_in: f32,

    #[serde(default = "default_title_pt")]
    pub title_pt: f32,

    /// Legend text size
    #[serde(default = "default_text_pt")]
    pub text_pt: f32,

    /// TrueType font; system fonts are searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_width_in() -> f32 {
    15.0
}

fn default_height_in() -> f32 {
    10.0
}

fn default_dpi() -> u32 {
    300
}

fn default_pad_in() -> f32 {
    0.1
}

fn default_title_pt() -> f32 {
    12.0
}

fn default_text_pt() -> f32 {
    10.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            pad_in: default_pad_in(),
            title_pt: default_title_pt(),
            text_pt: default_text_pt(),
            font_path: None,
        }
    }
}

/// Pixel layout of one figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub axes: PixelRect,
    pub legend: PixelRect,
}

/// Legend box metrics in pixels, derived from the text size.
#[derive(Debug, Clone, Copy)]
struct LegendMetrics {
    em: f32,
    border_pad: f32,
    patch_width: f32,
    patch_height: f32,
    text_gap: f32,
    row_pitch: f32,
    title_height: f32,
}

impl LegendMetrics {
    fn new(em: f32, has_title: bool) -> Self {
        Self {
            em,
            border_pad: 0.4 * em,
            patch_width: 2.0 * em,
            patch_height: 0.7 * em,
            text_gap: 0.8 * em,
            row_pitch: 1.5 * em,
            title_height: if has_title { 1.5 * em } else { 0.0 },
        }
    }
}

/// Compute canvas, axes and legend rectangles.
fn compute_layout(config: &RenderConfig, legend_size: (f32, f32)) -> Layout {
    let dpi = config.dpi as f32;
    let fig_w = config.width_in * dpi;
    let fig_h = config.height_in * dpi;

    let (left, top, right, bottom) = AXES_FRACTIONS;
    let axes = PixelRect::new(left * fig_w, top * fig_h, right * fig_w, bottom * fig_h);

    let legend_x = axes.x0 + LEGEND_ANCHOR.0 * axes.width();
    let legend_y = axes.y1 - LEGEND_ANCHOR.1 * axes.height();
    let legend = PixelRect::from_size(legend_x, legend_y, legend_size.0, legend_size.1);

    let margin = config.pad_in * dpi + 2.0;
    let canvas_width = fig_w.max(legend.x1 + margin).ceil() as u32;
    let canvas_height = fig_h.max(legend.y1 + margin).ceil() as u32;

    Layout {
        canvas_width,
        canvas_height,
        axes,
        legend,
    }
}

/// Render features into a new figure.
///
/// Features whose category is missing from the scheme are filled with the
/// scheme's default color and still get a legend patch.
#[instrument(skip(features, scheme, config), fields(features = features.len(), scheme = %scheme.name))]
pub fn render_choropleth(
    features: &[MapFeature],
    scheme: &CategoryScheme,
    title: &str,
    config: &RenderConfig,
) -> MapResult<Figure> {
    let legend = build_legend(scheme, features.iter().map(|f| f.category.as_str()));
    let font = load_font(config.font_path.as_deref());

    // Legend size depends on text metrics, so measure with a scratch figure
    let scratch = Figure::new(1, 1, config.dpi, font.clone())?;
    let metrics = LegendMetrics::new(scratch.pt(config.text_pt), !legend.title.is_empty());
    let legend_size = measure_legend(&scratch, &legend, &metrics);
    drop(scratch);

    let layout = compute_layout(config, legend_size);
    let mut figure = Figure::new(layout.canvas_width, layout.canvas_height, config.dpi, font)?;

    draw_features(&mut figure, features, scheme, &layout.axes);
    draw_title(&mut figure, title, config.title_pt, &layout.axes);
    draw_legend(&mut figure, &legend, &metrics, &layout.legend);

    info!(
        features = features.len(),
        legend_patches = legend.patches.len(),
        width = figure.width(),
        height = figure.height(),
        "Rendered choropleth"
    );

    Ok(figure)
}

fn draw_features(figure: &mut Figure, features: &[MapFeature], scheme: &CategoryScheme, axes: &PixelRect) {
    let Some(extent) = BoundingBox::of_all(features.iter().map(|f| &f.geometry)) else {
        debug!("No geometry to draw");
        return;
    };
    let projection = MapProjection::fit(&extent, axes);

    let edge = scheme
        .edge
        .as_ref()
        .map(|e| (e.color.to_rgba(), figure.pt(e.width_pt)));

    for feature in features {
        let Some((path, bounds)) = build_path(&feature.geometry, &projection) else {
            continue;
        };

        figure.fill_path(&path, scheme.color_for(&feature.category));
        match edge {
            Some((color, width)) => {
                figure.stroke_path(&path, color, width);
                figure.mark_content(bounds.expand(width / 2.0));
            }
            None => figure.mark_content(bounds),
        }
    }
}

/// Build one path holding every ring of a multi-polygon.
fn build_path(geometry: &MultiPolygon<f64>, projection: &MapProjection) -> Option<(tiny_skia::Path, PixelRect)> {
    let mut pb = PathBuilder::new();
    let mut bounds: Option<PixelRect> = None;

    for polygon in geometry {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            if let Some(ring_bounds) = add_ring(&mut pb, ring, projection) {
                bounds = Some(match bounds {
                    Some(b) => b.union(&ring_bounds),
                    None => ring_bounds,
                });
            }
        }
    }

    let path = pb.finish()?;
    Some((path, bounds?))
}

fn add_ring(pb: &mut PathBuilder, ring: &LineString<f64>, projection: &MapProjection) -> Option<PixelRect> {
    let mut points = ring.coords().map(|c| projection.project(c.x, c.y));
    let (x, y) = points.next()?;
    pb.move_to(x, y);

    let mut bounds = PixelRect::new(x, y, x, y);
    for (x, y) in points {
        pb.line_to(x, y);
        bounds = bounds.union(&PixelRect::new(x, y, x, y));
    }
    pb.close();
    Some(bounds)
}

fn draw_title(figure: &mut Figure, title: &str, title_pt: f32, axes: &PixelRect) {
    if title.is_empty() {
        return;
    }
    let size = figure.pt(title_pt);
    let (w, h) = figure.measure_text(title, size);
    let x = axes.center_x() - w / 2.0;
    let y = axes.y0 - figure.pt(TITLE_GAP_PT) - h;
    figure.text(title, x, y, size, TEXT_COLOR);
}

fn measure_legend(figure: &Figure, legend: &Legend, m: &LegendMetrics) -> (f32, f32) {
    let title_w = figure.measure_text(&legend.title, m.em).0;
    let label_w = legend
        .patches
        .iter()
        .map(|p| figure.measure_text(&p.label, m.em).0)
        .fold(0.0f32, f32::max);

    let row_w = m.patch_width + if label_w > 0.0 { m.text_gap + label_w } else { 0.0 };
    let width = 2.0 * m.border_pad + title_w.max(row_w);
    let height = 2.0 * m.border_pad + m.title_height + legend.patches.len() as f32 * m.row_pitch;
    (width, height)
}

fn draw_legend(figure: &mut Figure, legend: &Legend, m: &LegendMetrics, frame: &PixelRect) {
    figure.fill_rect(*frame, LEGEND_FRAME_FILL);
    let frame_width = figure.pt(0.8);
    figure.stroke_rect(*frame, LEGEND_FRAME_EDGE, frame_width);

    let inner_x = frame.x0 + m.border_pad;
    let mut y = frame.y0 + m.border_pad;

    if m.title_height > 0.0 {
        let title_w = figure.measure_text(&legend.title, m.em).0;
        let x = frame.center_x() - title_w / 2.0;
        figure.text(&legend.title, x, y, m.em, TEXT_COLOR);
        y += m.title_height;
    }

    for patch in &legend.patches {
        let patch_y = y + (m.row_pitch - m.patch_height) / 2.0;
        let swatch = PixelRect::from_size(inner_x, patch_y, m.patch_width, m.patch_height);
        figure.fill_rect(swatch, patch.color);

        let label_x = inner_x + m.patch_width + m.text_gap;
        let label_y = y + (m.row_pitch - m.em) / 2.0;
        figure.text(&patch.label, label_x, label_y, m.em, TEXT_COLOR);

        y += m.row_pitch;
    }
}
