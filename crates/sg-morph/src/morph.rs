use sg_core::{Image, ImageView};

use crate::ON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    All,
    Any,
}

/// Offsets `[lo, hi]` covered along one axis by a square element of side `k`.
fn kernel_span(k: usize) -> (isize, isize) {
    let k = k.max(1) as isize;
    let lo = -(k / 2);
    (lo, lo + k - 1)
}

/// `dst(p)` is set iff every `src(p + o)` with `o` in the element is set.
pub fn erode(src: &ImageView<'_, u8>, k: usize) -> Image<u8> {
    let (lo, hi) = kernel_span(k);
    separable(src, lo, hi, Rule::All)
}

/// `dst(p)` is set iff some `src(p + o)` with `o` in the element is set.
pub fn dilate(src: &ImageView<'_, u8>, k: usize) -> Image<u8> {
    let (lo, hi) = kernel_span(k);
    separable(src, lo, hi, Rule::Any)
}

/// Erosion followed by dilation with the mirrored element; never adds pixels.
pub fn open(src: &ImageView<'_, u8>, k: usize) -> Image<u8> {
    let (lo, hi) = kernel_span(k);
    let eroded = erode(src, k);
    separable(&eroded.as_view(), -hi, -lo, Rule::Any)
}

/// Dilation followed by erosion with the mirrored element; never removes
/// pixels.
pub fn close(src: &ImageView<'_, u8>, k: usize) -> Image<u8> {
    let (lo, hi) = kernel_span(k);
    let dilated = dilate(src, k);
    separable(&dilated.as_view(), -hi, -lo, Rule::All)
}

/// Morphological gradient: `dilate(src) - erode(src)`. For `k >= 2` the band
/// separates inside from outside under 4-connectivity.
pub fn gradient(src: &ImageView<'_, u8>, k: usize) -> Image<u8> {
    let mut out = dilate(src, k);
    let eroded = erode(src, k);
    for (o, &e) in out.data_mut().iter_mut().zip(eroded.data()) {
        if e != 0 {
            *o = 0;
        }
    }
    out
}

fn separable(src: &ImageView<'_, u8>, a: isize, b: isize, rule: Rule) -> Image<u8> {
    let (w, h) = (src.width(), src.height());
    let mut out = Image::new_fill(w, h, 0u8);
    if w == 0 || h == 0 {
        return out;
    }

    let mut prefix = Vec::with_capacity(w.max(h) + 1);
    let mut line = vec![0u8; w.max(h)];
    let mut swept = vec![0u8; w.max(h)];

    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        for (dst, &v) in line[..w].iter_mut().zip(src.row(y)) {
            *dst = u8::from(v != 0);
        }
        sweep(&line[..w], a, b, rule, &mut prefix, &mut swept[..w]);
        rows[y * w..(y + 1) * w].copy_from_slice(&swept[..w]);
    }

    let data = out.data_mut();
    for x in 0..w {
        for y in 0..h {
            line[y] = rows[y * w + x];
        }
        sweep(&line[..h], a, b, rule, &mut prefix, &mut swept[..h]);
        for y in 0..h {
            data[y * w + x] = if swept[y] != 0 { ON } else { 0 };
        }
    }

    out
}

/// One-dimensional windowed test over `line[i + a ..= i + b]`, clipped to
/// the line. `line` holds 0/1 flags.
fn sweep(line: &[u8], a: isize, b: isize, rule: Rule, prefix: &mut Vec<u32>, out: &mut [u8]) {
    let n = line.len() as isize;
    prefix.clear();
    prefix.push(0);
    let mut acc = 0u32;
    for &v in line {
        acc += u32::from(v);
        prefix.push(acc);
    }

    for i in 0..n {
        let s = (i + a).clamp(0, n) as usize;
        let e = (i + b + 1).clamp(0, n) as usize;
        let count = prefix[e] - prefix[s];
        let set = match rule {
            Rule::All => e > s && count as usize == e - s,
            Rule::Any => count > 0,
        };
        out[i as usize] = u8::from(set);
    }
}
