//! Border following on binary masks.
//!
//! [`find_contours`] traces every outer and hole border and links them into a
//! [`ContourForest`]. Helpers rasterize a contour's interior, compute its
//! polygon centroid and fit the smallest enclosing circle.

mod enclosing;
mod forest;
mod moments;
mod region;
mod trace;

pub use enclosing::min_enclosing_circle;
pub use forest::{Contour, ContourForest, ContourId, PixelPoint, Siblings};
pub use moments::{Moments, contour_centroid, mean_point};
pub use region::{fill_contour, fill_contour_into};
pub use trace::find_contours;
