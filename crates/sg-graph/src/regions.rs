//! Shared helpers for per-region measurements.

use sg_contour::{Contour, Moments, fill_contour, find_contours, mean_point};
use sg_core::Image;
use tracing::trace;

pub(crate) fn count_contours(mask: &Image<u8>) -> usize {
    find_contours(&mask.as_view()).len()
}

/// Integer seed pixel at the contour's polygon centroid. Zero-area contours
/// fall back to the mean of their boundary points.
pub(crate) fn seed_pixel(contour: &Contour) -> Option<(isize, isize)> {
    let centroid = match Moments::of_polygon(&contour.points).centroid() {
        Some(c) => c,
        None => {
            trace!(
                contour = contour.id,
                points = contour.points.len(),
                "degenerate contour, using mean boundary point"
            );
            mean_point(&contour.points)?
        }
    };
    Some(centroid.to_pixel())
}

/// Seed inside the filled `contour` that avoids set pixels of `blocked`:
/// the centroid seed when it is free, otherwise the free pixel nearest to
/// it (first in raster order on ties).
pub(crate) fn free_seed(contour: &Contour, blocked: &Image<u8>) -> Option<(isize, isize)> {
    let seed = seed_pixel(contour)?;
    if blocked
        .index_of(seed.0, seed.1)
        .is_some_and(|i| blocked.data()[i] == 0)
    {
        return Some(seed);
    }

    let (x0, y0, x1, y1) = contour.bounds()?;
    let region = fill_contour(blocked.width(), blocked.height(), contour);
    let mut best: Option<(isize, (isize, isize))> = None;
    for y in y0 as isize..=y1 as isize {
        for x in x0 as isize..=x1 as isize {
            let Some(i) = region.index_of(x, y) else {
                continue;
            };
            if region.data()[i] == 0 || blocked.data()[i] != 0 {
                continue;
            }
            let d2 = (x - seed.0).pow(2) + (y - seed.1).pow(2);
            if best.is_none_or(|(bd2, _)| d2 < bd2) {
                best = Some((d2, (x, y)));
            }
        }
    }
    if let Some((_, p)) = best {
        trace!(contour = contour.id, from = ?seed, to = ?p, "seed moved off blocked pixel");
    }
    best.map(|(_, p)| p)
}

/// Largest value of `values` over set pixels of `region`.
pub(crate) fn max_in(values: &Image<f32>, region: &Image<u8>) -> f32 {
    values
        .data()
        .iter()
        .zip(region.data())
        .filter(|&(_, &m)| m != 0)
        .map(|(&v, _)| v)
        .fold(0.0, f32::max)
}

/// Maximum of `values` inside `region` and the truncated mean position of
/// every pixel attaining it.
pub(crate) fn peak(values: &Image<f32>, region: &Image<u8>) -> Option<(f32, (i32, i32))> {
    let best = max_in(values, region);
    if best <= 0.0 {
        return None;
    }

    let w = values.width();
    let (mut sx, mut sy, mut n) = (0u64, 0u64, 0u64);
    for (i, (&v, &m)) in values.data().iter().zip(region.data()).enumerate() {
        if m != 0 && v == best {
            sx += (i % w) as u64;
            sy += (i / w) as u64;
            n += 1;
        }
    }
    Some((best, ((sx / n) as i32, (sy / n) as i32)))
}
