//! Single-scale edgel extraction.
//!
//! Normal direction: `n` follows the image gradient `(gx, gy)` and points from
//! dark to bright, i.e. into set pixels of a mask.
//!
//! Threshold behavior:
//! - If `high_thresh == 0.0` and `low_thresh == 0.0`, thresholds are chosen
//!   automatically as `high = 0.2 * max_nms`, `low = 0.1 * max_nms`.
//! - Otherwise provided thresholds are used as-is (with low/high ordering fixed
//!   if needed).

use sg_core::{Image, ImageView, Point2f, Vec2f};

#[derive(Debug, Clone, PartialEq)]
pub struct Edgel {
    pub p: Point2f,
    pub n: Vec2f,
    pub strength: f32,
    pub idx: (usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeConfig {
    pub pre_smooth: bool,
    pub low_thresh: f32,
    pub high_thresh: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            pre_smooth: true,
            low_thresh: 0.0,
            high_thresh: 0.0,
        }
    }
}

/// Reusable edge detector; scratch buffers persist between calls.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    tmp: Image<f32>,
    gx: Image<f32>,
    gy: Image<f32>,
    mag: Image<f32>,
    nms: Image<f32>,
    weak: Vec<u8>,
    visited: Vec<u8>,
    stack: Vec<usize>,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self {
            tmp: Image::new_fill(0, 0, 0.0),
            gx: Image::new_fill(0, 0, 0.0),
            gy: Image::new_fill(0, 0, 0.0),
            mag: Image::new_fill(0, 0, 0.0),
            nms: Image::new_fill(0, 0, 0.0),
            weak: Vec::new(),
            visited: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn detect(&mut self, img: &ImageView<'_, u8>, cfg: &EdgeConfig) -> Vec<Edgel> {
        let (w, h) = (img.width(), img.height());
        self.ensure_dims(w, h);
        if w == 0 || h == 0 {
            return Vec::new();
        }

        {
            let dst = self.tmp.data_mut();
            for y in 0..h {
                for (d, &s) in dst[y * w..(y + 1) * w].iter_mut().zip(img.row(y)) {
                    *d = s as f32;
                }
            }
        }

        if cfg.pre_smooth {
            self.smooth_binomial3();
        }
        self.compute_scharr();
        self.non_max_suppression();
        let count = self.hysteresis(cfg);
        self.build_edgels(count)
    }

    fn ensure_dims(&mut self, w: usize, h: usize) {
        if self.tmp.width() != w || self.tmp.height() != h {
            self.tmp = Image::new_fill(w, h, 0.0);
            self.gx = Image::new_fill(w, h, 0.0);
            self.gy = Image::new_fill(w, h, 0.0);
            self.mag = Image::new_fill(w, h, 0.0);
            self.nms = Image::new_fill(w, h, 0.0);
        }

        let n = w.saturating_mul(h);
        if self.weak.len() != n {
            self.weak = vec![0; n];
            self.visited = vec![0; n];
        }
    }

    fn smooth_binomial3(&mut self) {
        let w = self.tmp.width();
        let h = self.tmp.height();

        {
            let src = self.tmp.data();
            let dst = self.gx.data_mut();
            for y in 0..h {
                let row = y * w;
                for x in 0..w {
                    let xm1 = x.saturating_sub(1);
                    let xp1 = (x + 1).min(w - 1);
                    dst[row + x] = 0.25 * (src[row + xm1] + 2.0 * src[row + x] + src[row + xp1]);
                }
            }
        }

        {
            let src = self.gx.data();
            let dst = self.tmp.data_mut();
            for y in 0..h {
                let r0 = y.saturating_sub(1) * w;
                let r1 = y * w;
                let r2 = (y + 1).min(h - 1) * w;
                for x in 0..w {
                    dst[r1 + x] = 0.25 * (src[r0 + x] + 2.0 * src[r1 + x] + src[r2 + x]);
                }
            }
        }
    }

    fn compute_scharr(&mut self) {
        let w = self.tmp.width();
        let h = self.tmp.height();
        let src = self.tmp.data();
        let gx = self.gx.data_mut();
        let gy = self.gy.data_mut();
        let mag = self.mag.data_mut();

        for y in 0..h {
            let rows = [y.saturating_sub(1) * w, y * w, (y + 1).min(h - 1) * w];
            for x in 0..w {
                let cols = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
                let at = |r: usize, c: usize| src[rows[r] + cols[c]];

                // Scharr taps 3-10-3 across the smoothing axis.
                let mut sx = 0.0;
                let mut sy = 0.0;
                for (k, wt) in [3.0f32, 10.0, 3.0].into_iter().enumerate() {
                    sx += wt * (at(k, 2) - at(k, 0));
                    sy += wt * (at(2, k) - at(0, k));
                }

                let idx = y * w + x;
                gx[idx] = sx;
                gy[idx] = sy;
                mag[idx] = sx.hypot(sy);
            }
        }
    }

    fn non_max_suppression(&mut self) {
        let w = self.tmp.width();
        let h = self.tmp.height();
        let gx = self.gx.data();
        let gy = self.gy.data();
        let mag = self.mag.data();
        let nms = self.nms.data_mut();

        nms.fill(0.0);
        if w < 3 || h < 3 {
            return;
        }

        for y in 1..(h - 1) {
            for x in 1..(w - 1) {
                let idx = y * w + x;
                let m = mag[idx];
                if m <= 0.0 {
                    continue;
                }

                let step = Sector::of(gx[idx], gy[idx]).step(w);
                if m >= mag[idx - step] && m >= mag[idx + step] {
                    nms[idx] = m;
                }
            }
        }
    }

    /// Resolves the thresholds, seeds from strong pixels and grows through
    /// 8-connected weak ones. Returns the number of accepted pixels.
    fn hysteresis(&mut self, cfg: &EdgeConfig) -> usize {
        let w = self.tmp.width();
        let h = self.tmp.height();

        self.weak.fill(0);
        self.visited.fill(0);
        self.stack.clear();

        let Some((low, high)) = thresholds(self.nms.data(), cfg) else {
            return 0;
        };

        for (idx, &v) in self.nms.data().iter().enumerate() {
            if v <= 0.0 || v < low {
                continue;
            }
            self.weak[idx] = 1;
            if v >= high {
                self.visited[idx] = 1;
                self.stack.push(idx);
            }
        }

        let mut count = self.stack.len();
        while let Some(idx) = self.stack.pop() {
            let (x, y) = (idx % w, idx / w);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let nidx = ny * w + nx;
                    if self.visited[nidx] == 0 && self.weak[nidx] != 0 {
                        self.visited[nidx] = 1;
                        self.stack.push(nidx);
                        count += 1;
                    }
                }
            }
        }

        count
    }

    fn build_edgels(&self, count_hint: usize) -> Vec<Edgel> {
        let w = self.tmp.width();
        let h = self.tmp.height();
        let gx = self.gx.data();
        let gy = self.gy.data();
        let mag = self.mag.data();
        let nms = self.nms.data();

        let mut out = Vec::with_capacity(count_hint);
        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                if self.visited[idx] == 0 {
                    continue;
                }

                let m = mag[idx];
                if m <= 1e-12 {
                    continue;
                }

                let n = Vec2f {
                    x: gx[idx] / m,
                    y: gy[idx] / m,
                }
                .normalize();
                if n.norm() <= 1e-6 {
                    continue;
                }

                out.push(Edgel {
                    p: Point2f::new(x as f32, y as f32),
                    n,
                    strength: nms[idx],
                    idx: (x, y),
                });
            }
        }

        out
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Gradient direction quantized to the four neighbour axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sector {
    Horizontal,
    Vertical,
    Falling,
    Rising,
}

impl Sector {
    const TAN22_5: f32 = 0.414_213_57;
    const TAN67_5: f32 = 2.414_213_7;

    fn of(gx: f32, gy: f32) -> Self {
        let (ax, ay) = (gx.abs(), gy.abs());
        if ay <= ax * Self::TAN22_5 {
            Sector::Horizontal
        } else if ay >= ax * Self::TAN67_5 {
            Sector::Vertical
        } else if gx * gy > 0.0 {
            Sector::Falling
        } else {
            Sector::Rising
        }
    }

    /// Linear offset to the neighbour along the gradient.
    fn step(self, w: usize) -> usize {
        match self {
            Sector::Horizontal => 1,
            Sector::Vertical => w,
            Sector::Falling => w + 1,
            Sector::Rising => w - 1,
        }
    }
}

/// `(low, high)`; zero for both picks fractions of the strongest response.
fn thresholds(nms: &[f32], cfg: &EdgeConfig) -> Option<(f32, f32)> {
    if cfg.low_thresh == 0.0 && cfg.high_thresh == 0.0 {
        let max = nms.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return None;
        }
        return Some((0.1 * max, 0.2 * max));
    }
    let (low, high) = (cfg.low_thresh, cfg.high_thresh);
    Some((low.min(high), low.max(high)))
}
