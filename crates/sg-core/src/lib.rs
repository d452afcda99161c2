//! Foundational primitives for diagram extraction.
//!
//! ## Images and Views
//! [`Image`] owns a row-major buffer. [`ImageView`] borrows one with an
//! element stride (not byte stride), so a view may cover a padded buffer or a
//! sub-rectangle of a larger image.
//!
//! ## Colour Input
//! Decoded rasters enter as interleaved bytes and are validated into an
//! [`Image<Rgb8>`]. Grayscale conversion uses fixed-point BT.601 weights so
//! results are bit-exact across platforms.
//!
//! ## Coordinates
//! Integer `(x, y)` is the center of pixel `(x, y)`; `x` grows to the right
//! and `y` grows downwards.

mod color;
mod error;
mod geom;
mod image;

pub use color::{Rgb8, from_interleaved, to_gray};
pub use error::Error;
pub use geom::{Circle, Point2f, Vec2f};
pub use image::{Image, ImageView};
