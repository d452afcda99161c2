use sg_core::{Image, ImageView};

use crate::ON;

/// `255` where `src > t`, `0` elsewhere.
pub fn threshold_above(src: &ImageView<'_, u8>, t: u8) -> Image<u8> {
    let mut out = Vec::with_capacity(src.width() * src.height());
    for y in 0..src.height() {
        out.extend(src.row(y).iter().map(|&v| if v > t { ON } else { 0 }));
    }
    Image::from_vec(src.width(), src.height(), out).expect("one sample per pixel")
}

pub fn invert(src: &Image<u8>) -> Image<u8> {
    src.map(|&v| if v == 0 { ON } else { 0 })
}

pub fn bitor(a: &Image<u8>, b: &Image<u8>) -> Image<u8> {
    combine(a, b, |x, y| x || y)
}

pub fn bitand(a: &Image<u8>, b: &Image<u8>) -> Image<u8> {
    combine(a, b, |x, y| x && y)
}

/// Pixels set in `a` but not in `b`.
pub fn subtract(a: &Image<u8>, b: &Image<u8>) -> Image<u8> {
    combine(a, b, |x, y| x && !y)
}

pub fn count_nonzero(src: &Image<u8>) -> usize {
    src.data().iter().filter(|&&v| v != 0).count()
}

pub fn is_empty(src: &Image<u8>) -> bool {
    src.data().iter().all(|&v| v == 0)
}

fn combine(a: &Image<u8>, b: &Image<u8>, op: impl Fn(bool, bool) -> bool) -> Image<u8> {
    assert_eq!(a.width(), b.width(), "mask widths must match");
    assert_eq!(a.height(), b.height(), "mask heights must match");

    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| if op(x != 0, y != 0) { ON } else { 0 })
        .collect();
    Image::from_vec(a.width(), a.height(), data).expect("dimensions checked above")
}

#[cfg(test)]
mod tests {
    use sg_core::Image;

    use super::{bitand, bitor, count_nonzero, invert, is_empty, subtract, threshold_above};

    #[test]
    fn threshold_is_strict() {
        let img = Image::from_vec(4, 1, vec![0u8, 253, 254, 255]).expect("valid image");
        let out = threshold_above(&img.as_view(), 254);
        assert_eq!(out.data(), &[0, 0, 0, 255]);
    }

    #[test]
    fn set_algebra_on_small_masks() {
        let a = Image::from_vec(4, 1, vec![255u8, 255, 0, 0]).expect("valid image");
        let b = Image::from_vec(4, 1, vec![0u8, 7, 9, 0]).expect("valid image");

        assert_eq!(bitor(&a, &b).data(), &[255, 255, 255, 0]);
        assert_eq!(bitand(&a, &b).data(), &[0, 255, 0, 0]);
        assert_eq!(subtract(&a, &b).data(), &[255, 0, 0, 0]);
        assert_eq!(invert(&a).data(), &[0, 0, 255, 255]);
        assert_eq!(count_nonzero(&b), 2);
        assert!(is_empty(&bitand(&subtract(&a, &b), &b)));
    }

    #[test]
    #[should_panic(expected = "mask widths must match")]
    fn mismatched_masks_panic() {
        let a = Image::new_fill(2, 2, 0u8);
        let b = Image::new_fill(3, 2, 0u8);
        let _ = bitor(&a, &b);
    }
}
