//! Tests for choropleth rendering and PNG output.

use geo::{LineString, MultiPolygon, Polygon};
use renderer::{render_choropleth, write_unmatched, MapFeature, RenderConfig, UnmatchedColumns};
use test_utils::fixtures::square;
use test_utils::{ids, Workspace};
use tract_common::{CategoryScheme, Color, GeoId, UNKNOWN_CATEGORY};

// ============================================================================
// Helper functions
// ============================================================================

fn small_config() -> RenderConfig {
    RenderConfig {
        width_in: 4.0,
        height_in: 3.0,
        dpi: 30,
        ..RenderConfig::default()
    }
}

fn feature(geoid: &str, category: &str, geometry: MultiPolygon<f64>) -> MapFeature {
    MapFeature {
        geoid: GeoId::new(geoid),
        category: category.to_string(),
        geometry,
    }
}

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

fn has_pixel(image: &image::RgbaImage, rgb: [u8; 3]) -> bool {
    image
        .pixels()
        .any(|p| p.0 == [rgb[0], rgb[1], rgb[2], 255])
}

// ============================================================================
// Fill colors
// ============================================================================

#[test]
fn test_high_opportunity_tract_is_green() {
    let features = vec![feature(ids::WAYNE_TRACT, "1", square(-83.2, 42.3, 0.05))];
    let figure = render_choropleth(
        &features,
        &CategoryScheme::opportunity(),
        "Opportunity Rankings by Census Tract - Detroit (2020)",
        &small_config(),
    )
    .unwrap();

    let (bytes, _, _) = figure.encode_png(0.1).unwrap();
    assert!(has_pixel(&decode(&bytes), [46, 204, 113]));
}

#[test]
fn test_unmapped_category_uses_default_color() {
    let mut scheme = CategoryScheme::opportunity();
    scheme.default_color = Color::Hex("#123456".to_string());

    let features = vec![
        feature(ids::WAYNE_TRACT, "3", square(-83.2, 42.3, 0.05)),
        feature(ids::WAYNE_TRACT_2, "9", square(-83.15, 42.3, 0.05)),
    ];
    let figure = render_choropleth(&features, &scheme, "", &small_config()).unwrap();
    let image = decode(&figure.encode_png(0.1).unwrap().0);

    assert!(has_pixel(&image, [0x12, 0x34, 0x56]));
    assert!(has_pixel(&image, [0xe7, 0x4c, 0x3c]));
}

#[test]
fn test_interior_ring_is_a_hole() {
    let exterior = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
    let hole = LineString::from(vec![(0.3, 0.3), (0.7, 0.3), (0.7, 0.7), (0.3, 0.7), (0.3, 0.3)]);
    let geometry = MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])]);

    let mut scheme = CategoryScheme::opportunity();
    scheme.edge = None;
    let features = vec![feature(ids::WAYNE_TRACT, "1", geometry)];

    let figure = render_choropleth(&features, &scheme, "", &small_config()).unwrap();
    let image = figure.to_image();

    // Axes are 0.125..0.9 × 0.12..0.89 of a 120 × 90 canvas; the square is centered
    let cx = ((0.125 + 0.9) / 2.0 * 120.0) as u32;
    let cy = ((0.12 + 0.89) / 2.0 * 90.0) as u32;
    assert_eq!(image.get_pixel(cx, cy).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(cx + 25, cy).0, [46, 204, 113, 255]);
}

#[test]
fn test_empty_features_still_render_legend() {
    let figure = render_choropleth(&[], &CategoryScheme::opportunity(), "Empty", &small_config()).unwrap();
    let image = decode(&figure.encode_png(0.0).unwrap().0);
    assert!(has_pixel(&image, [0xf1, 0xc4, 0x0f]));
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_missing_font_file_still_draws_labels() {
    let config = RenderConfig {
        font_path: Some("/nonexistent/fonts/NoSuchFont.ttf".into()),
        dpi: 72,
        text_pt: 14.0,
        ..small_config()
    };
    let features = vec![feature(ids::WAYNE_TRACT, "1", square(-83.2, 42.3, 0.05))];
    let figure = render_choropleth(&features, &CategoryScheme::opportunity(), "", &config).unwrap();
    assert!(figure.has_font());

    // No title, so dark pixels right of the axes can only be legend labels
    let image = figure.to_image();
    let legend_x = (0.9 * 4.0 * 72.0) as u32;
    let dark = image
        .enumerate_pixels()
        .filter(|(x, _, p)| *x > legend_x && p.0[0] < 100 && p.0[1] < 100 && p.0[2] < 100)
        .count();
    assert!(dark > 10, "expected legend label pixels, found {}", dark);
}

// ============================================================================
// Output file
// ============================================================================

#[test]
fn test_saved_png_is_cropped_and_has_resolution() {
    let ws = Workspace::new();
    let path = ws.path("output/detroit_opportunity.png");

    let features = vec![feature(ids::WAYNE_TRACT, "2", square(-83.2, 42.3, 0.05))];
    let figure = render_choropleth(&features, &CategoryScheme::opportunity(), "Detroit", &small_config()).unwrap();
    let saved = figure.save_png(&path, 0.1).unwrap();

    assert_eq!(saved.dpi, 30);
    assert!(saved.width < figure.width());

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.windows(4).any(|w| w == b"pHYs"));

    let image = decode(&bytes);
    assert_eq!(image.dimensions(), (saved.width, saved.height));
}

// ============================================================================
// Unmatched side file
// ============================================================================

#[test]
fn test_unmatched_rows_written() {
    let ws = Workspace::new();
    let path = ws.path("unmatched_tracts.csv");

    let features = vec![
        feature(ids::WAYNE_TRACT, "white_nh", square(0.0, 0.0, 1.0)),
        feature(ids::APACHE_TRACT, UNKNOWN_CATEGORY, square(1.0, 0.0, 1.0)),
    ];
    let written = write_unmatched(&path, &features, &UnmatchedColumns::default()).unwrap();
    assert_eq!(written, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "GEOID,dominant_race\n04001944201,Unknown\n");
}

#[test]
fn test_no_unmatched_rows_means_no_file() {
    let ws = Workspace::new();
    let path = ws.path("unmatched_tracts.csv");

    let features = vec![feature(ids::WAYNE_TRACT, "hispanic", square(0.0, 0.0, 1.0))];
    let written = write_unmatched(&path, &features, &UnmatchedColumns::default()).unwrap();

    assert_eq!(written, 0);
    assert!(!path.exists());
}
