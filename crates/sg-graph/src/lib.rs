//! Circle-and-connector diagram extraction.
//!
//! [`extract`] turns a decoded 3-channel raster into a [`ProgramGraph`]:
//! binary masks, distance-transform cores confirmed by Hough circle centers,
//! connector regions typed by fill-contour counts, path/node links through
//! region growing, and node types from the fill topology inside each node.
//!
//! Only malformed input is an error. Missing nodes, dangling connectors and
//! unmatched topology degrade to empty lists, short endpoint lists and
//! [`NodeType::Undefined`].

pub mod classify;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod index;
pub mod masks;
pub mod nodes;
pub mod paths;
pub mod program;
mod regions;

use sg_core::{Image, Rgb8, from_interleaved};
use sg_hough::HoughCircle;
use tracing::{info, instrument};

pub use classify::{NodeType, classify, classify_nodes};
pub use config::{
    ClassifyConfig, ConnectivityConfig, ExtractConfig, MaskConfig, NodeConfig, PathConfig,
};
pub use connectivity::resolve_connectivity;
pub use error::ExtractError;
pub use index::{BruteForce, KdTree, SpatialIndex};
pub use masks::{Masks, build_masks};
pub use nodes::{NodeDetection, detect_nodes};
pub use paths::{PathExtraction, PathRegion, PathType, extract_paths};
pub use program::{GraphSummary, MAX_ENDPOINTS, Node, NodeId, Path, PathId, ProgramGraph};

/// Borrowed interleaved 8-bit pixel buffer as handed over by a decoder.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> Raster<'a> {
    pub fn new(width: usize, height: usize, channels: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    fn to_rgb(self) -> Result<Image<Rgb8>, ExtractError> {
        Ok(from_interleaved(
            self.width,
            self.height,
            self.channels,
            self.data,
        )?)
    }
}

/// Intermediate results kept for inspection.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub masks: Masks,
    pub core_mask: Image<u8>,
    pub node_mask: Image<u8>,
    pub paths_mask: Image<u8>,
    pub hough: Vec<HoughCircle>,
    /// Stroke half-width per path, indexed by path id.
    pub half_widths: Vec<f32>,
}

pub fn extract(raster: Raster<'_>, cfg: &ExtractConfig) -> Result<ProgramGraph, ExtractError> {
    let image = raster.to_rgb()?;
    Ok(run(image, cfg).0)
}

pub fn extract_with_artifacts(
    raster: Raster<'_>,
    cfg: &ExtractConfig,
) -> Result<(ProgramGraph, Artifacts), ExtractError> {
    let image = raster.to_rgb()?;
    Ok(run(image, cfg))
}

/// Runs the pipeline on an already decoded RGB image.
pub fn extract_rgb(image: Image<Rgb8>, cfg: &ExtractConfig) -> ProgramGraph {
    run(image, cfg).0
}

#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
fn run(image: Image<Rgb8>, cfg: &ExtractConfig) -> (ProgramGraph, Artifacts) {
    let masks = build_masks(&image.as_view(), &cfg.masks);

    let NodeDetection {
        mut nodes,
        node_mask,
        core_mask,
        hough,
        index,
    } = detect_nodes(&masks, &cfg.nodes);

    let extraction = extract_paths(&masks, &node_mask, &cfg.paths);
    let regions = &extraction.regions;

    let mut paths: Vec<Path> = regions
        .iter()
        .map(|r| Path::new(r.id, r.path_type))
        .collect();
    resolve_connectivity(
        regions,
        &mut paths,
        &mut nodes,
        &node_mask,
        &index,
        &cfg.connectivity,
    );

    classify_nodes(
        &mut nodes,
        &masks.fill,
        &node_mask,
        extraction.max_half_width(),
        &cfg.classify,
    );

    let graph = ProgramGraph::new(image, nodes, paths);
    info!(summary = %graph.summary(), "extraction finished");

    let artifacts = Artifacts {
        masks,
        core_mask,
        node_mask,
        half_widths: regions.iter().map(|r| r.half_width).collect(),
        paths_mask: extraction.paths_mask,
        hough,
    };
    (graph, artifacts)
}
