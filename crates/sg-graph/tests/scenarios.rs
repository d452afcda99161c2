mod common;

use common::{Canvas, INK, isolated_node, marked_connector, simple_connector};
use sg_graph::{ExtractConfig, NodeType, PathType, extract, extract_with_artifacts};
use sg_morph::{bitand, count_nonzero};

#[test]
fn isolated_node_is_undefined_without_paths() {
    let canvas = isolated_node();
    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");

    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.paths.is_empty());

    let node = &graph.nodes[0];
    assert_eq!(node.node_type, NodeType::Undefined);
    assert!(node.connected_paths.is_empty());
    assert!((node.center.0 - 100).abs() <= 1 && (node.center.1 - 100).abs() <= 1);
    assert!((29.0..=31.0).contains(&node.radius), "radius {}", node.radius);
}

#[test]
fn simple_connector_links_two_normal_nodes() {
    let canvas = simple_connector();
    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.paths.len(), 1);

    let mut centers: Vec<_> = graph.nodes.iter().map(|n| n.center).collect();
    centers.sort();
    assert_eq!(centers, vec![(50, 50), (150, 50)]);
    for node in &graph.nodes {
        assert_eq!(node.radius, 20.0);
        assert_eq!(node.node_type, NodeType::Normal, "node {}", node.id);
        assert_eq!(node.connected_paths.iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    let path = &graph.paths[0];
    assert_eq!(path.path_type, PathType::PLAIN);
    let mut ends = path.connected_nodes.clone();
    ends.sort();
    assert_eq!(ends, vec![0, 1]);
}

#[test]
fn connector_half_width_comes_from_the_stroke_core() {
    let canvas = simple_connector();
    let (_, artifacts) =
        extract_with_artifacts(canvas.raster(), &ExtractConfig::default()).expect("valid raster");
    assert_eq!(artifacts.half_widths, vec![3.0]);
}

#[test]
fn paths_never_overlap_nodes() {
    let canvas = simple_connector();
    let (graph, artifacts) =
        extract_with_artifacts(canvas.raster(), &ExtractConfig::default()).expect("valid raster");

    assert!(count_nonzero(&artifacts.paths_mask) > 0);
    assert_eq!(count_nonzero(&bitand(&artifacts.paths_mask, &artifacts.node_mask)), 0);
    assert_eq!(artifacts.half_widths.len(), graph.paths.len());
}

#[test]
fn stray_connector_stays_dangling() {
    let mut canvas = Canvas::new(200, 200);
    canvas.node(60, 100, 20, 16);
    canvas.connector(120, 190, 40, 54);

    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.paths.len(), 1);
    assert!(graph.paths[0].connected_nodes.is_empty());
    assert_eq!(graph.nodes[0].node_type, NodeType::Undefined);
    assert_eq!(graph.summary().dangling_paths, 1);
}

#[test]
fn extraction_is_deterministic() {
    let canvas = simple_connector();
    let cfg = ExtractConfig::default();
    let a = extract(canvas.raster(), &cfg).expect("valid raster");
    let b = extract(canvas.raster(), &cfg).expect("valid raster");

    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.paths, b.paths);
}

#[test]
fn bare_ring_without_interior_is_still_a_node() {
    let mut canvas = Canvas::new(160, 160);
    canvas.disk(80, 80, 30, INK);
    canvas.disk(80, 80, 24, common::BACKGROUND);

    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");
    assert_eq!(graph.nodes.len(), 1);
    // Without a solid interior the distance peak is the ring half-width.
    let node = &graph.nodes[0];
    assert!(node.radius >= 1.0 && node.radius < 5.0, "radius {}", node.radius);
    assert!((node.center.0 - 80).abs() <= 2 && (node.center.1 - 80).abs() <= 2);
}

#[test]
fn fill_dots_away_from_the_center_type_the_connector() {
    let canvas = marked_connector();
    let (graph, artifacts) =
        extract_with_artifacts(canvas.raster(), &ExtractConfig::default()).expect("valid raster");

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.paths.len(), 1);
    assert_eq!(artifacts.half_widths, vec![3.0]);

    // Two strips reach the center probe, the two dots do not.
    let path = &graph.paths[0];
    assert_eq!(path.path_type.code(), 2);
    let mut ends = path.connected_nodes.clone();
    ends.sort();
    assert_eq!(ends, vec![0, 1]);
}

fn left_node_type(canvas: &Canvas) -> NodeType {
    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");
    assert_eq!(graph.nodes.len(), 2);
    let node = graph
        .nodes
        .iter()
        .find(|n| n.center == (50, 50))
        .expect("left node detected");
    assert_eq!(node.connected_paths.len(), 1);
    node.node_type
}

#[test]
fn ink_center_makes_an_output_node() {
    let mut canvas = simple_connector();
    canvas.disk(50, 50, 13, INK);
    assert_eq!(left_node_type(&canvas), NodeType::Output);
}

#[test]
fn split_center_makes_a_decrement_node() {
    let mut canvas = simple_connector();
    canvas.rect(49, 52, 34, 67, INK);
    assert_eq!(left_node_type(&canvas), NodeType::Decrement);
}

#[test]
fn quartered_center_makes_an_increment_node() {
    let mut canvas = simple_connector();
    canvas.rect(49, 52, 34, 67, INK);
    canvas.rect(34, 67, 49, 52, INK);
    assert_eq!(left_node_type(&canvas), NodeType::Increment);
}

#[test]
fn graph_serializes_with_type_fields() {
    let canvas = simple_connector();
    let graph = extract(canvas.raster(), &ExtractConfig::default()).expect("valid raster");
    let json = serde_json::to_value(&graph).expect("serializable graph");

    assert_eq!(json["width"], 200);
    assert_eq!(json["height"], 100);
    assert_eq!(json["nodes"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["nodes"][0]["type"], "Normal");
    assert_eq!(json["paths"][0]["type"], 0);
    assert!(json.get("image").is_none());
}
