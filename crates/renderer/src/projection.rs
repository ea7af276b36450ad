//! Lon/lat to canvas pixel mapping.
//!
//! Longitude is scaled by the cosine of the mean latitude of the extent so
//! that shapes keep roughly their ground proportions at city and county scale.

use tract_common::BoundingBox;

/// Axis-aligned rectangle in canvas pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PixelRect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Grow by `amount` on every side.
    pub fn expand(&self, amount: f32) -> PixelRect {
        PixelRect {
            x0: self.x0 - amount,
            y0: self.y0 - amount,
            x1: self.x1 + amount,
            y1: self.y1 + amount,
        }
    }
}

/// Equirectangular projection of an extent fitted into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    min_lon: f64,
    max_lat: f64,
    x_scale: f64,
    pixels_per_degree: f64,
    offset_x: f64,
    offset_y: f64,
}

impl MapProjection {
    /// Fit `extent` into `viewport`, preserving aspect ratio and centering.
    pub fn fit(extent: &BoundingBox, viewport: &PixelRect) -> Self {
        let x_scale = extent.center_y().to_radians().cos().abs().max(1e-6);
        let data_w = extent.width() * x_scale;
        let data_h = extent.height();
        let view_w = viewport.width() as f64;
        let view_h = viewport.height() as f64;

        let pixels_per_degree = match (data_w > 0.0, data_h > 0.0) {
            (true, true) => (view_w / data_w).min(view_h / data_h),
            (true, false) => view_w / data_w,
            (false, true) => view_h / data_h,
            (false, false) => 1.0,
        };

        Self {
            min_lon: extent.min_x,
            max_lat: extent.max_y,
            x_scale,
            pixels_per_degree,
            offset_x: viewport.x0 as f64 + (view_w - data_w * pixels_per_degree) / 2.0,
            offset_y: viewport.y0 as f64 + (view_h - data_h * pixels_per_degree) / 2.0,
        }
    }

    /// Canvas position of a lon/lat coordinate.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let x = self.offset_x + (lon - self.min_lon) * self.x_scale * self.pixels_per_degree;
        let y = self.offset_y + (self.max_lat - lat) * self.pixels_per_degree;
        (x as f32, y as f32)
    }

    /// Horizontal scale factor applied to longitude.
    pub fn x_scale(&self) -> f64 {
        self.x_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_equator_square_fills_square_viewport() {
        let extent = BoundingBox::new(0.0, -0.5, 1.0, 0.5);
        let view = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let proj = MapProjection::fit(&extent, &view);

        let (x, y) = proj.project(0.0, 0.5);
        assert_approx_eq!(x, 0.0, 1e-3);
        assert_approx_eq!(y, 0.0, 1e-3);

        let (x, y) = proj.project(1.0, -0.5);
        assert_approx_eq!(x, 100.0, 1e-3);
        assert_approx_eq!(y, 100.0, 1e-3);
    }

    #[test]
    fn test_longitude_shrinks_at_60_degrees() {
        let extent = BoundingBox::new(0.0, 59.5, 1.0, 60.5);
        let view = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let proj = MapProjection::fit(&extent, &view);

        assert_approx_eq!(proj.x_scale(), 0.5, 1e-9);
        let (left, _) = proj.project(0.0, 60.0);
        let (right, _) = proj.project(1.0, 60.0);
        assert_approx_eq!(right - left, 50.0, 1e-3);
        // Centered horizontally
        assert_approx_eq!(left, 25.0, 1e-3);
    }

    #[test]
    fn test_north_is_up() {
        let extent = BoundingBox::new(-83.3, 42.2, -83.0, 42.5);
        let view = PixelRect::new(10.0, 10.0, 210.0, 110.0);
        let proj = MapProjection::fit(&extent, &view);

        let (_, north) = proj.project(-83.1, 42.5);
        let (_, south) = proj.project(-83.1, 42.2);
        assert!(north < south);
    }

    #[test]
    fn test_degenerate_extent_does_not_divide_by_zero() {
        let extent = BoundingBox::new(-83.0, 42.0, -83.0, 42.0);
        let view = PixelRect::new(0.0, 0.0, 50.0, 50.0);
        let (x, y) = MapProjection::fit(&extent, &view).project(-83.0, 42.0);
        assert!(x.is_finite() && y.is_finite());
        assert_approx_eq!(x, 25.0, 1e-3);
    }
}
