//! Binary mask toolkit.
//!
//! Pixels are treated as binary with threshold `> 0`; every mask produced
//! here holds only `0` or `255`.
//!
//! Square structuring elements of side `k` are anchored OpenCV-style at
//! `k / 2`: `erode`, `dilate` and `gradient` look at offsets
//! `-(k / 2) ..= k - 1 - k / 2` on each axis. `open` and `close` pair the
//! element with its mirror image, so opening is anti-extensive
//! (`open(a) ⊆ a`) and closing extensive for every `k`. Pixels outside the
//! image never take part in a neighbourhood.

mod distance;
mod draw;
mod fill;
mod mask;
mod morph;

pub use distance::distance_transform;
pub use draw::{disk_mask, fill_disk};
pub use fill::flood_fill;
pub use mask::{
    bitand, bitor, count_nonzero, invert, is_empty, subtract, threshold_above,
};
pub use morph::{close, dilate, erode, gradient, open};

/// Value written for set pixels.
pub const ON: u8 = 255;
