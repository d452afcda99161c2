//! Exact Euclidean distance transform (Felzenszwalb & Huttenlocher).
//!
//! Every set pixel receives the distance from its center to the center of
//! the nearest unset pixel; unset pixels receive `0`. The region outside the
//! image counts as unset, so distances are bounded by the distance to the
//! image border.

use sg_core::{Image, ImageView};

const FAR: f64 = 1e20;

pub fn distance_transform(src: &ImageView<'_, u8>) -> Image<f32> {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        return Image::new_fill(w, h, 0.0);
    }

    // Padded by one unset pixel on every side.
    let pw = w + 2;
    let ph = h + 2;
    let mut grid = vec![0.0f64; pw * ph];
    for y in 0..h {
        for (x, &v) in src.row(y).iter().enumerate() {
            if v != 0 {
                grid[(y + 1) * pw + x + 1] = FAR;
            }
        }
    }

    let n = pw.max(ph);
    let mut f = vec![0.0f64; n];
    let mut d = vec![0.0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];

    for x in 0..pw {
        for y in 0..ph {
            f[y] = grid[y * pw + x];
        }
        lower_envelope(&f[..ph], &mut d[..ph], &mut v, &mut z);
        for y in 0..ph {
            grid[y * pw + x] = d[y];
        }
    }

    let mut out = Vec::with_capacity(w * h);
    for y in 1..=h {
        let row = &grid[y * pw..(y + 1) * pw];
        f[..pw].copy_from_slice(row);
        lower_envelope(&f[..pw], &mut d[..pw], &mut v, &mut z);
        out.extend(d[1..=w].iter().map(|&sq| sq.sqrt() as f32));
    }

    Image::from_vec(w, h, out).expect("one distance per pixel")
}

/// Squared distance transform of a sampled function along one line.
fn lower_envelope(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }

    let mut k = 0usize;
    v[0] = 0;
    z[0] = -FAR;
    z[1] = FAR;

    for q in 1..n {
        let qf = q as f64;
        let mut s;
        loop {
            let vk = v[k] as f64;
            s = ((f[q] + qf * qf) - (f[v[k]] + vk * vk)) / (2.0 * qf - 2.0 * vk);
            if s > z[k] || k == 0 {
                break;
            }
            k -= 1;
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = FAR;
    }

    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        d[q] = dq * dq + f[v[k]];
    }
}
