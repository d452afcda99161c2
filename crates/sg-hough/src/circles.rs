//! Hough-gradient circle detection.
//!
//! Every edgel votes for all cells along its gradient line, in both
//! directions, at distances `min_radius..=max_radius`. The accumulator is
//! aggregated over 3x3 neighbourhoods; local maxima reaching
//! `vote_threshold` become candidates, visited in descending vote order
//! (ties by raster index). A candidate is kept when it lies at least
//! `min_dist` from every kept circle and enough edgels sit on a common radius
//! around it: at least `vote_threshold` of them, and at least `min_coverage`
//! of the circumference. The coverage bound rejects wide circles stitched
//! from arc fragments of separate shapes.

use serde::{Deserialize, Serialize};
use sg_core::{ImageView, Point2f};

use crate::edges::{EdgeConfig, EdgeDetector, Edgel};

/// Width, in whole-pixel bins, of the radius support window.
const RADIUS_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Minimum distance between accepted centers, in pixels.
    pub min_dist: f32,
    pub min_radius: usize,
    /// Defaults to the shorter image side.
    pub max_radius: Option<usize>,
    /// Minimum aggregated votes for a center and minimum edgel support for
    /// its radius.
    pub vote_threshold: u32,
    /// Minimum radius support as a fraction of the circumference `2πr`.
    pub min_coverage: f32,
    /// Hysteresis thresholds on gradient magnitude; both `0` selects them
    /// from the strongest response.
    pub edge_low: f32,
    pub edge_high: f32,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            min_dist: 50.0,
            min_radius: 0,
            max_radius: None,
            vote_threshold: 50,
            min_coverage: 0.4,
            edge_low: 0.0,
            edge_high: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoughCircle {
    pub center: Point2f,
    pub radius: f32,
    pub votes: u32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    votes: u32,
    idx: usize,
}

/// Reusable detector; the edge stage and accumulators keep their buffers.
#[derive(Debug, Clone, Default)]
pub struct HoughDetector {
    edges: EdgeDetector,
    acc: Vec<u32>,
    boxed: Vec<u32>,
}

impl HoughDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect(&mut self, mask: &ImageView<'_, u8>, cfg: &HoughConfig) -> Vec<HoughCircle> {
        let (w, h) = (mask.width(), mask.height());
        let edge_cfg = EdgeConfig {
            pre_smooth: true,
            low_thresh: cfg.edge_low,
            high_thresh: cfg.edge_high,
        };
        let edgels = self.edges.detect(mask, &edge_cfg);
        if edgels.is_empty() {
            return Vec::new();
        }

        let min_r = cfg.min_radius.max(1);
        let max_r = cfg.max_radius.unwrap_or(w.min(h));
        if min_r > max_r {
            return Vec::new();
        }

        self.vote(&edgels, w, h, min_r, max_r);
        self.aggregate(w, h);

        let mut candidates = local_maxima(&self.boxed, w, h, cfg.vote_threshold);
        candidates.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.idx.cmp(&b.idx)));

        let mut out: Vec<HoughCircle> = Vec::new();
        for cand in candidates {
            let center = Point2f::new((cand.idx % w) as f32, (cand.idx / w) as f32);
            if out.iter().any(|c| c.center.distance(center) < cfg.min_dist) {
                continue;
            }
            if let Some((radius, support)) = estimate_radius(&edgels, center, min_r, max_r)
                && support >= cfg.vote_threshold
                && support as f32 >= cfg.min_coverage * std::f32::consts::TAU * radius
            {
                out.push(HoughCircle {
                    center,
                    radius,
                    votes: cand.votes,
                });
            }
        }

        out
    }

    fn vote(&mut self, edgels: &[Edgel], w: usize, h: usize, min_r: usize, max_r: usize) {
        self.acc.clear();
        self.acc.resize(w * h, 0);

        for e in edgels {
            for sign in [1.0f32, -1.0] {
                for r in min_r..=max_r {
                    let t = sign * r as f32;
                    let x = (e.p.x + t * e.n.x + 0.5).floor();
                    let y = (e.p.y + t * e.n.y + 0.5).floor();
                    if x < 0.0 || y < 0.0 || x >= w as f32 || y >= h as f32 {
                        break;
                    }
                    self.acc[y as usize * w + x as usize] += 1;
                }
            }
        }
    }

    fn aggregate(&mut self, w: usize, h: usize) {
        self.boxed.clear();
        self.boxed.resize(w * h, 0);

        for y in 0..h {
            for x in 0..w {
                let mut sum = 0;
                for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        sum += self.acc[ny * w + nx];
                    }
                }
                self.boxed[y * w + x] = sum;
            }
        }
    }
}

/// Convenience wrapper around a fresh [`HoughDetector`].
pub fn detect_circles(mask: &ImageView<'_, u8>, cfg: &HoughConfig) -> Vec<HoughCircle> {
    HoughDetector::new().detect(mask, cfg)
}

fn local_maxima(acc: &[u32], w: usize, h: usize, threshold: u32) -> Vec<Candidate> {
    let at = |x: isize, y: isize| {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            acc[y as usize * w + x as usize]
        }
    };

    let mut out = Vec::new();
    for y in 0..h as isize {
        for x in 0..w as isize {
            let v = at(x, y);
            if v < threshold.max(1) {
                continue;
            }
            if v > at(x - 1, y) && v >= at(x + 1, y) && v > at(x, y - 1) && v >= at(x, y + 1) {
                out.push(Candidate {
                    votes: v,
                    idx: y as usize * w + x as usize,
                });
            }
        }
    }
    out
}

/// Most populated radius window around `center`: `(mean radius, support)`.
fn estimate_radius(
    edgels: &[Edgel],
    center: Point2f,
    min_r: usize,
    max_r: usize,
) -> Option<(f32, u32)> {
    let mut bins = vec![0u32; max_r + 2];
    let mut dists = Vec::with_capacity(edgels.len());
    for e in edgels {
        let d = e.p.distance(center);
        if d < min_r as f32 || d >= (max_r + 1) as f32 {
            continue;
        }
        bins[d as usize] += 1;
        dists.push(d);
    }

    let mut best = None;
    for start in min_r..=max_r {
        let end = (start + RADIUS_WINDOW).min(bins.len());
        let support: u32 = bins[start..end].iter().sum();
        if support > 0 && best.is_none_or(|(_, s)| support > s) {
            best = Some((start, support));
        }
    }

    let (start, support) = best?;
    let end = start + RADIUS_WINDOW;
    let (sum, n) = dists
        .iter()
        .filter(|&&d| (start..end).contains(&(d as usize)))
        .fold((0.0f32, 0u32), |(s, n), &d| (s + d, n + 1));
    Some((sum / n as f32, support))
}
