//! Umbrella crate for the `sketch-graph` workspace.
//!
//! Re-exports the image primitives and the extraction pipeline.

pub use sg_core::{Circle, Image, ImageView, Point2f, Rgb8, from_interleaved, to_gray};
pub use sg_graph::*;
