use sg_core::Point2f;

use crate::forest::PixelPoint;

const DEGENERATE_AREA: f64 = 1e-9;

/// Spatial moments of the polygon spanned by a closed point chain.
///
/// `m00` is signed by traversal orientation; the centroid is orientation
/// independent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn of_polygon(points: &[PixelPoint]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut m = Self::default();
        for i in 0..n {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
            let a = x0 * y1 - x1 * y0;
            m.m00 += a;
            m.m10 += (x0 + x1) * a;
            m.m01 += (y0 + y1) * a;
        }
        m.m00 *= 0.5;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m
    }

    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// `None` when the enclosed area vanishes (lines, single pixels).
    pub fn centroid(&self) -> Option<Point2f> {
        if self.m00.abs() < DEGENERATE_AREA {
            return None;
        }
        Some(Point2f::new(
            (self.m10 / self.m00) as f32,
            (self.m01 / self.m00) as f32,
        ))
    }
}

/// Arithmetic mean of the chain points.
pub fn mean_point(points: &[PixelPoint]) -> Option<Point2f> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0f64, 0.0f64), |(sx, sy), &(x, y)| (sx + x as f64, sy + y as f64));
    Some(Point2f::new((sx / n) as f32, (sy / n) as f32))
}

/// Polygon centroid, falling back to the mean boundary point for
/// zero-area chains.
pub fn contour_centroid(points: &[PixelPoint]) -> Option<Point2f> {
    Moments::of_polygon(points)
        .centroid()
        .or_else(|| mean_point(points))
}
