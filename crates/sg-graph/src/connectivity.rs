//! Links each connector to the nodes it touches.
//!
//! The connector region is grown, intersected with the node disks, and the
//! touched node interiors are recovered by filling inside the node boundary
//! band. Each recovered interior is matched to the nearest node by its
//! enclosing circle. A touch whose centroid lands on the band is seeded at
//! its nearest interior pixel instead.

use sg_contour::{find_contours, min_enclosing_circle};
use sg_core::Image;
use sg_morph::{ON, bitand, dilate, flood_fill, gradient, subtract};
use tracing::{debug, info, instrument, trace};

use crate::config::ConnectivityConfig;
use crate::index::SpatialIndex;
use crate::paths::PathRegion;
use crate::program::{Node, NodeId, Path};
use crate::regions::free_seed;

/// Node ids touched by one region, deduplicated in discovery order.
pub fn touched_nodes<I: SpatialIndex<3>>(
    region: &PathRegion,
    node_mask: &Image<u8>,
    boundary: &Image<u8>,
    index: &I,
    cfg: &ConnectivityConfig,
) -> Vec<NodeId> {
    let k = ((cfg.dilate_scale * region.half_width) as usize).max(1);
    let grown = dilate(&region.region.as_view(), k);
    let touch = bitand(&grown, node_mask);

    let mut filled = boundary.clone();
    for contour in find_contours(&touch.as_view()).iter() {
        if let Some(seed) = free_seed(contour, boundary) {
            flood_fill(&mut filled, seed, ON, None);
        }
    }
    let reached = subtract(&filled, boundary);

    let mut out = Vec::new();
    for contour in find_contours(&reached.as_view()).iter() {
        let Some(circle) = min_enclosing_circle(&contour.points) else {
            continue;
        };
        let key = [
            circle.center.x as f64,
            circle.center.y as f64,
            circle.radius as f64,
        ];
        if let Some((d, id)) = index.nearest(key) {
            trace!(path = region.id, node = id, distance = d, "touch");
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

/// Fills `connected_nodes` of every path and `connected_paths` of every node.
#[instrument(skip_all)]
pub fn resolve_connectivity<I: SpatialIndex<3>>(
    regions: &[PathRegion],
    paths: &mut [Path],
    nodes: &mut [Node],
    node_mask: &Image<u8>,
    index: &I,
    cfg: &ConnectivityConfig,
) {
    if index.is_empty() {
        info!(links = 0, "connectivity");
        return;
    }

    let boundary = gradient(&node_mask.as_view(), cfg.gradient_kernel);
    let mut links = 0;
    for (region, path) in regions.iter().zip(paths.iter_mut()) {
        for id in touched_nodes(region, node_mask, &boundary, index, cfg) {
            if !path.connect(id) {
                if !path.connected_nodes.contains(&id) {
                    debug!(path = path.id, node = id, "endpoint limit reached, touch ignored");
                }
                continue;
            }
            if let Some(node) = nodes.get_mut(id) {
                node.connected_paths.insert(path.id);
            }
            links += 1;
        }
        debug!(path = path.id, nodes = ?path.connected_nodes, "resolved path");
    }
    info!(links, "connectivity");
}

#[cfg(test)]
mod tests {
    use sg_core::Image;
    use sg_morph::{ON, disk_mask, fill_disk, gradient};

    use super::touched_nodes;
    use crate::config::ConnectivityConfig;
    use crate::index::{KdTree, SpatialIndex};
    use crate::paths::{PathRegion, PathType};

    fn bar(w: usize, h: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> Image<u8> {
        let mut img = Image::new_fill(w, h, 0u8);
        for y in y0..y1 {
            for x in x0..x1 {
                *img.get_mut(x, y).expect("inside canvas") = ON;
            }
        }
        img
    }

    fn region(mask: Image<u8>, half_width: f32) -> PathRegion {
        PathRegion {
            id: 0,
            region: mask,
            half_width,
            fill_centroid: (0, 0),
            fill_contours: 0,
            center_contours: 0,
            path_type: PathType::PLAIN,
        }
    }

    #[test]
    fn bar_between_two_disks_touches_both() {
        let (w, h) = (200, 100);
        let mut node_mask = disk_mask(w, h, (50, 50), 20);
        fill_disk(&mut node_mask, (150, 50), 20, ON);
        let mut index = KdTree::new();
        index.insert([50.0, 50.0, 20.0], 0);
        index.insert([150.0, 50.0, 20.0], 1);

        let cfg = ConnectivityConfig::default();
        let boundary = gradient(&node_mask.as_view(), cfg.gradient_kernel);
        let path = region(bar(w, h, 71, 130, 44, 57), 3.0);

        let nodes = touched_nodes(&path, &node_mask, &boundary, &index, &cfg);
        assert_eq!(nodes, vec![0, 1]);
    }

    #[test]
    fn far_bar_touches_nothing() {
        let (w, h) = (200, 100);
        let node_mask = disk_mask(w, h, (50, 50), 20);
        let mut index = KdTree::new();
        index.insert([50.0, 50.0, 20.0], 0);

        let cfg = ConnectivityConfig::default();
        let boundary = gradient(&node_mask.as_view(), cfg.gradient_kernel);
        let path = region(bar(w, h, 120, 180, 44, 57), 3.0);

        assert!(touched_nodes(&path, &node_mask, &boundary, &index, &cfg).is_empty());
    }
}
