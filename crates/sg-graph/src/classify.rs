//! Node typing from fill-region counts inside each node.

use std::fmt;

use serde::{Deserialize, Serialize};
use sg_core::Image;
use sg_morph::{bitand, disk_mask};
use tracing::debug;

use crate::config::ClassifyConfig;
use crate::program::Node;
use crate::regions::count_contours;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum NodeType {
    Normal,
    Start,
    Increment,
    Decrement,
    Output,
    #[default]
    Undefined,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Normal => "Normal",
            NodeType::Start => "Start",
            NodeType::Increment => "Increment",
            NodeType::Decrement => "Decrement",
            NodeType::Output => "Output",
            NodeType::Undefined => "Undefined",
        };
        f.write_str(name)
    }
}

/// Decision table over `paths` (connected path count), `center` (fill
/// regions near the node center) and `total` (fill regions in the node).
pub fn classify(paths: usize, center: usize, total: usize) -> NodeType {
    if paths == 0 {
        return NodeType::Undefined;
    }
    match center {
        0 => NodeType::Output,
        1 if 2 * paths + 1 == total => NodeType::Normal,
        1 if 4 * paths + 1 == total => NodeType::Start,
        2 => NodeType::Decrement,
        4 => NodeType::Increment,
        _ => NodeType::Undefined,
    }
}

/// Assigns `node_type` to every node. `max_half_width` is the widest stroke
/// half-width over all paths (`0` without paths).
pub fn classify_nodes(
    nodes: &mut [Node],
    fill: &Image<u8>,
    node_mask: &Image<u8>,
    max_half_width: f32,
    cfg: &ClassifyConfig,
) {
    let (w, h) = (fill.width(), fill.height());
    let fill_in_nodes = bitand(fill, node_mask);
    let probe_radius = (cfg.center_probe_scale * max_half_width.trunc()) as isize;

    for node in nodes.iter_mut() {
        let paths = node.connected_paths.len();
        if paths == 0 {
            node.node_type = NodeType::Undefined;
            debug!(node = node.id, "no connected paths");
            continue;
        }

        let center = (node.center.0 as isize, node.center.1 as isize);
        let disk = disk_mask(w, h, center, node.radius as isize);
        let node_fill = bitand(&fill_in_nodes, &disk);
        let probe = disk_mask(w, h, center, probe_radius);

        let total = count_contours(&node_fill);
        let near_center = count_contours(&bitand(&node_fill, &probe));

        node.node_type = classify(paths, near_center, total);
        debug!(
            node = node.id,
            paths,
            center = near_center,
            total,
            node_type = %node.node_type,
            "classified node"
        );
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{NodeType, classify};

    #[test]
    fn decision_table() {
        assert_eq!(classify(0, 1, 3), NodeType::Undefined);
        assert_eq!(classify(2, 0, 9), NodeType::Output);
        assert_eq!(classify(1, 1, 3), NodeType::Normal);
        assert_eq!(classify(2, 1, 5), NodeType::Normal);
        assert_eq!(classify(1, 1, 5), NodeType::Start);
        assert_eq!(classify(1, 1, 4), NodeType::Undefined);
        assert_eq!(classify(1, 2, 0), NodeType::Decrement);
        assert_eq!(classify(3, 4, 1), NodeType::Increment);
        assert_eq!(classify(1, 3, 3), NodeType::Undefined);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn disconnected_nodes_are_always_undefined(center in 0usize..16, total in 0usize..32) {
            prop_assert_eq!(classify(0, center, total), NodeType::Undefined);
        }

        #[test]
        fn empty_center_means_output(paths in 1usize..8, total in 0usize..32) {
            prop_assert_eq!(classify(paths, 0, total), NodeType::Output);
        }

        #[test]
        fn unmatched_center_counts_fall_back(paths in 1usize..8, center in 5usize..16, total in 0usize..32) {
            prop_assert_eq!(classify(paths, center, total), NodeType::Undefined);
        }
    }
}
