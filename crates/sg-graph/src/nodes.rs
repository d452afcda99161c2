//! Circle node detection from distance-transform cores confirmed by Hough
//! centers.

use sg_contour::{fill_contour, find_contours};
use sg_core::Image;
use sg_hough::{HoughCircle, HoughDetector};
use sg_morph::{ON, distance_transform, fill_disk};
use tracing::{debug, info, instrument, trace};

use crate::config::NodeConfig;
use crate::index::{KdTree, SpatialIndex};
use crate::masks::Masks;
use crate::program::Node;
use crate::regions::peak;

#[derive(Debug, Clone)]
pub struct NodeDetection {
    pub nodes: Vec<Node>,
    /// Union of the confirmed node disks.
    pub node_mask: Image<u8>,
    pub core_mask: Image<u8>,
    pub hough: Vec<HoughCircle>,
    /// Confirmed nodes keyed by `(x, y, r)`.
    pub index: KdTree<3>,
}

#[instrument(skip_all)]
pub fn detect_nodes(masks: &Masks, cfg: &NodeConfig) -> NodeDetection {
    let (w, h) = (masks.width(), masks.height());
    let dist = distance_transform(&masks.foreground.as_view());
    let core_mask = core_mask(&dist, cfg.core_cutoff);

    let hough = HoughDetector::new().detect(&masks.stroke.as_view(), &cfg.hough);
    let centers: Vec<([f64; 2], usize)> = hough
        .iter()
        .enumerate()
        .map(|(i, c)| ([c.center.x as f64, c.center.y as f64], i))
        .collect();
    let hough_index = KdTree::build(&centers);

    let mut nodes = Vec::new();
    let mut node_mask = Image::new_fill(w, h, 0u8);
    let mut index = KdTree::new();

    let cores = find_contours(&core_mask.as_view());
    for core in cores.outer() {
        let blob = fill_contour(w, h, core);
        let Some((max_dist, (x, y))) = peak(&dist, &blob) else {
            continue;
        };

        let Some((gap, hough_id)) = hough_index.nearest([x as f64, y as f64]) else {
            trace!(core = core.id, "no hough candidates");
            continue;
        };
        if gap >= max_dist as f64 {
            trace!(core = core.id, x, y, gap, max_dist, "core not confirmed");
            continue;
        }

        let radius = max_dist.trunc();
        if radius < 1.0 {
            trace!(core = core.id, max_dist, "core too small");
            continue;
        }

        let id = nodes.len();
        debug!(node = id, x, y, radius, hough = hough_id, gap, "confirmed node");
        fill_disk(&mut node_mask, (x as isize, y as isize), radius as isize, ON);
        index.insert([x as f64, y as f64, radius as f64], id);
        nodes.push(Node::new(id, (x, y), radius));
    }

    info!(
        cores = cores.outer().count(),
        hough = hough.len(),
        nodes = nodes.len(),
        "node detection"
    );

    NodeDetection {
        nodes,
        node_mask,
        core_mask,
        hough,
        index,
    }
}

/// Pixels whose distance exceeds `cutoff` times the global maximum.
fn core_mask(dist: &Image<f32>, cutoff: f32) -> Image<u8> {
    let max = dist.data().iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return dist.map(|_| 0u8);
    }
    dist.map(|&d| if d / max > cutoff { ON } else { 0 })
}

#[cfg(test)]
mod tests {
    use sg_core::Image;

    use super::core_mask;

    #[test]
    fn core_cutoff_is_strict_and_relative() {
        let dist = Image::from_vec(4, 1, vec![0.0f32, 1.0, 2.0, 4.0]).expect("valid image");
        assert_eq!(core_mask(&dist, 0.5).data(), &[0, 0, 0, 255]);
        assert_eq!(core_mask(&dist, 0.25).data(), &[0, 0, 255, 255]);
        assert_eq!(core_mask(&dist, 0.2).data(), &[0, 255, 255, 255]);
    }

    #[test]
    fn empty_distance_map_has_no_core() {
        let dist = Image::new_fill(3, 3, 0.0f32);
        assert!(core_mask(&dist, 0.5).data().iter().all(|&v| v == 0));
    }
}
