//! Circle evidence for mask images.
//!
//! [`edges`] extracts Canny-style edgels (binomial smoothing, Scharr
//! gradients, non-maximum suppression, hysteresis). [`circles`] lets every
//! edgel vote along its gradient line and returns well separated, well
//! supported circle candidates.
//!
//! Coordinates follow the pixel-center convention: integer `(x, y)` is the
//! center of pixel `(x, y)`.

pub mod circles;
pub mod edges;

pub use circles::{HoughCircle, HoughConfig, HoughDetector, detect_circles};
pub use edges::{EdgeConfig, EdgeDetector, Edgel};
