//! Connector extraction and topological path typing.

use std::fmt;

use serde::{Deserialize, Serialize};
use sg_contour::{Contour, Moments, contour_centroid, fill_contour, find_contours};
use sg_core::{Image, Point2f};
use sg_morph::{ON, bitand, disk_mask, distance_transform, flood_fill, open, subtract};
use tracing::{debug, info, instrument};

use crate::config::PathConfig;
use crate::masks::Masks;
use crate::program::PathId;
use crate::regions::{count_contours, max_in, seed_pixel};

/// Signed code derived from fill-contour counts: `0` for a plain connector,
/// otherwise the number of fill regions beyond the two sides of a stroke.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PathType(i32);

impl PathType {
    pub const PLAIN: PathType = PathType(0);

    pub fn new(code: i32) -> Self {
        Self(code)
    }

    /// `(total - 2) * [center != total]`.
    pub fn from_counts(total: usize, center: usize) -> Self {
        if center == total {
            return Self::PLAIN;
        }
        Self(total as i32 - 2)
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One connector and the measurements later stages need.
#[derive(Debug, Clone)]
pub struct PathRegion {
    pub id: PathId,
    /// Filled outer contour of the connector.
    pub region: Image<u8>,
    /// Largest stroke distance inside the region.
    pub half_width: f32,
    pub fill_centroid: (isize, isize),
    pub fill_contours: usize,
    pub center_contours: usize,
    pub path_type: PathType,
}

#[derive(Debug, Clone)]
pub struct PathExtraction {
    /// `open(foreground - node_mask)`.
    pub paths_mask: Image<u8>,
    pub regions: Vec<PathRegion>,
}

impl PathExtraction {
    /// Widest half-width over all paths, `0` without paths.
    pub fn max_half_width(&self) -> f32 {
        self.regions.iter().map(|r| r.half_width).fold(0.0, f32::max)
    }
}

#[instrument(skip_all)]
pub fn extract_paths(masks: &Masks, node_mask: &Image<u8>, cfg: &PathConfig) -> PathExtraction {
    let (w, h) = (masks.width(), masks.height());
    let free = subtract(&masks.foreground, node_mask);
    let paths_mask = open(&free.as_view(), cfg.open_kernel);

    let forest = find_contours(&paths_mask.as_view());
    let mut regions = Vec::new();
    for contour in forest.outer() {
        let id = regions.len();
        let region = fill_contour(w, h, contour);

        let stroke = bitand(&masks.stroke, &region);
        let half_width = max_in(&distance_transform(&stroke.as_view()), &region);

        let fill = bitand(&masks.fill, &region);
        let fill_forest = find_contours(&fill.as_view());
        let fill_centroid = weighted_centroid(fill_forest.iter())
            .or_else(|| contour_centroid(&contour.points))
            .map_or((0, 0), Point2f::to_pixel);

        let probe_radius = (cfg.probe_scale * half_width) as isize;
        let center_contours =
            count_center_regions(&masks.stroke, fill_centroid, probe_radius, w, h);
        let fill_contours = fill_forest.len();
        let path_type = PathType::from_counts(fill_contours, center_contours);

        debug!(
            path = id,
            half_width,
            fill_contours,
            center_contours,
            path_type = %path_type,
            "extracted path"
        );

        regions.push(PathRegion {
            id,
            region,
            half_width,
            fill_centroid,
            fill_contours,
            center_contours,
            path_type,
        });
    }

    info!(paths = regions.len(), "path extraction");
    PathExtraction {
        paths_mask,
        regions,
    }
}

/// Flood-fills every non-stroke region the probe disk touches and counts
/// the resulting contours.
fn count_center_regions(
    stroke: &Image<u8>,
    center: (isize, isize),
    radius: isize,
    w: usize,
    h: usize,
) -> usize {
    let probe = subtract(&disk_mask(w, h, center, radius), stroke);
    let mut filled = Image::new_fill(w, h, 0u8);
    for contour in find_contours(&probe.as_view()).iter() {
        if let Some(seed) = seed_pixel(contour) {
            flood_fill(&mut filled, seed, ON, Some(stroke));
        }
    }
    count_contours(&filled)
}

/// Area-weighted mean of the contour centroids, `Σm10 / Σm00` over the
/// polygons. When every contour is degenerate the plain mean of their
/// centroids is used instead.
fn weighted_centroid<'a>(contours: impl Iterator<Item = &'a Contour>) -> Option<Point2f> {
    let (mut sa, mut sx, mut sy) = (0.0f64, 0.0f64, 0.0f64);
    let mut fallback = Vec::new();
    for contour in contours {
        let m = Moments::of_polygon(&contour.points);
        let Some(c) = contour_centroid(&contour.points) else {
            continue;
        };
        let area = m.area();
        sa += area;
        sx += area * c.x as f64;
        sy += area * c.y as f64;
        fallback.push(c);
    }

    if sa > 0.0 {
        return Some(Point2f::new((sx / sa) as f32, (sy / sa) as f32));
    }
    if fallback.is_empty() {
        return None;
    }
    let n = fallback.len() as f32;
    let (fx, fy) = fallback.iter().fold((0.0f32, 0.0f32), |(x, y), c| (x + c.x, y + c.y));
    Some(Point2f::new(fx / n, fy / n))
}

#[cfg(test)]
mod tests {
    use sg_contour::find_contours;
    use sg_core::Image;

    use super::{PathType, weighted_centroid};

    #[test]
    fn path_type_arithmetic() {
        assert_eq!(PathType::from_counts(4, 2).code(), 2);
        assert_eq!(PathType::from_counts(4, 4), PathType::PLAIN);
        assert_eq!(PathType::from_counts(2, 1).code(), 0);
        assert_eq!(PathType::from_counts(1, 0).code(), -1);
        assert_eq!(PathType::from_counts(0, 0), PathType::PLAIN);
    }

    #[test]
    fn fill_centroid_weights_by_area() {
        let mut img = Image::new_fill(40, 20, 0u8);
        for y in 2..7 {
            for x in 2..12 {
                *img.get_mut(x, y).expect("inside canvas") = 255;
            }
        }
        for y in 12..15 {
            for x in 30..33 {
                *img.get_mut(x, y).expect("inside canvas") = 255;
            }
        }
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 2);

        // Polygon areas 36 (9 x 4) and 4 (2 x 2) around (6.5, 4) and (31, 13).
        let c = weighted_centroid(forest.iter()).expect("two contours");
        assert!((c.x - (36.0 * 6.5 + 4.0 * 31.0) / 40.0).abs() < 1e-4);
        assert!((c.y - (36.0 * 4.0 + 4.0 * 13.0) / 40.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_fill_contours_fall_back_to_plain_mean() {
        let mut img = Image::new_fill(20, 10, 0u8);
        *img.get_mut(2, 2).expect("inside canvas") = 255;
        *img.get_mut(8, 6).expect("inside canvas") = 255;
        let forest = find_contours(&img.as_view());

        let c = weighted_centroid(forest.iter()).expect("two contours");
        assert_eq!(c.to_pixel(), (5, 4));
        assert!(weighted_centroid(std::iter::empty()).is_none());
    }
}
