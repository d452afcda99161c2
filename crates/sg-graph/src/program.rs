use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use sg_core::{Image, Rgb8};

use crate::classify::NodeType;
use crate::paths::PathType;

pub type NodeId = usize;
pub type PathId = usize;

/// Most nodes a single connector may join.
pub const MAX_ENDPOINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub center: (i32, i32),
    pub radius: f32,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub connected_paths: BTreeSet<PathId>,
}

impl Node {
    pub fn new(id: NodeId, center: (i32, i32), radius: f32) -> Self {
        Self {
            id,
            center,
            radius,
            node_type: NodeType::Undefined,
            connected_paths: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: PathId,
    #[serde(rename = "type")]
    pub path_type: PathType,
    pub connected_nodes: Vec<NodeId>,
}

impl Path {
    pub fn new(id: PathId, path_type: PathType) -> Self {
        Self {
            id,
            path_type,
            connected_nodes: Vec::new(),
        }
    }

    /// Records a touched node once; returns `false` for repeats and once
    /// both endpoints are taken.
    pub fn connect(&mut self, node: NodeId) -> bool {
        if self.connected_nodes.contains(&node) || self.connected_nodes.len() >= MAX_ENDPOINTS {
            return false;
        }
        self.connected_nodes.push(node);
        true
    }
}

/// Extraction result: the source image with its nodes and connectors.
///
/// Serializes as `{width, height, nodes, paths}`; pixel data is left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramGraph {
    image: Image<Rgb8>,
    pub nodes: Vec<Node>,
    pub paths: Vec<Path>,
}

impl ProgramGraph {
    pub fn new(image: Image<Rgb8>, nodes: Vec<Node>, paths: Vec<Path>) -> Self {
        Self {
            image,
            nodes,
            paths,
        }
    }

    pub fn image(&self) -> &Image<Rgb8> {
        &self.image
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id)
    }

    pub fn summary(&self) -> GraphSummary {
        let mut by_type = BTreeMap::new();
        for node in &self.nodes {
            *by_type.entry(node.node_type).or_insert(0) += 1;
        }
        GraphSummary {
            nodes: self.nodes.len(),
            paths: self.paths.len(),
            by_type,
            dangling_paths: self
                .paths
                .iter()
                .filter(|p| p.connected_nodes.len() < MAX_ENDPOINTS)
                .count(),
        }
    }
}

#[derive(Serialize)]
struct GraphRecord<'a> {
    width: usize,
    height: usize,
    nodes: &'a [Node],
    paths: &'a [Path],
}

impl Serialize for ProgramGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphRecord {
            width: self.width(),
            height: self.height(),
            nodes: &self.nodes,
            paths: &self.paths,
        }
        .serialize(serializer)
    }
}

/// Counters for a one-line report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub paths: usize,
    pub by_type: BTreeMap<NodeType, usize>,
    /// Paths with fewer than two endpoints.
    pub dangling_paths: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} paths ({} dangling)",
            self.nodes, self.paths, self.dangling_paths
        )?;
        for (ty, n) in &self.by_type {
            write!(f, ", {ty}: {n}")?;
        }
        Ok(())
    }
}
