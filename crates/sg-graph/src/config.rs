//! Pipeline tunables.
//!
//! Every struct deserializes with `#[serde(default)]`, so a partial JSON
//! document only overrides the fields it names.

use serde::{Deserialize, Serialize};
use sg_hough::HoughConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub masks: MaskConfig,
    pub nodes: NodeConfig,
    pub paths: PathConfig,
    pub connectivity: ConnectivityConfig,
    pub classify: ClassifyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Gray levels strictly above this are fill.
    pub fill_threshold: u8,
    /// Inverted gray levels strictly above this are stroke.
    pub stroke_threshold: u8,
    /// Side of the closing element applied to `fill | stroke`.
    pub close_kernel: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            fill_threshold: 254,
            stroke_threshold: 254,
            close_kernel: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Fraction of the global distance maximum a core pixel must exceed.
    pub core_cutoff: f32,
    pub hough: HoughConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            core_cutoff: 0.5,
            hough: HoughConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Side of the opening element applied to `foreground - node_mask`.
    pub open_kernel: usize,
    /// Probe disk radius as a multiple of the stroke half-width.
    pub probe_scale: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            open_kernel: 6,
            probe_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Dilation kernel side as a multiple of the stroke half-width.
    pub dilate_scale: f32,
    /// Side of the element for the node boundary gradient.
    pub gradient_kernel: usize,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            dilate_scale: 2.0,
            gradient_kernel: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Center probe radius as a multiple of the widest path half-width.
    pub center_probe_scale: f32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            center_probe_scale: 4.0,
        }
    }
}
