use sg_core::Image;

use crate::ON;

/// Sets every pixel whose center lies within `radius` of `center`
/// (`dx² + dy² <= r²`). Parts of the disk outside the image are clipped.
pub fn fill_disk(img: &mut Image<u8>, center: (isize, isize), radius: isize, value: u8) {
    if radius < 0 {
        return;
    }

    let (cx, cy) = center;
    let r2 = radius * radius;
    let w = img.width() as isize;
    let h = img.height() as isize;
    let y0 = (cy - radius).max(0);
    let y1 = (cy + radius).min(h - 1);

    for y in y0..=y1 {
        let dy = y - cy;
        let reach = isqrt(r2 - dy * dy);
        let x0 = (cx - reach).max(0);
        let x1 = (cx + reach).min(w - 1);
        if x0 > x1 {
            continue;
        }
        let row = (y * w) as usize;
        img.data_mut()[row + x0 as usize..=row + x1 as usize].fill(value);
    }
}

/// A fresh `width × height` mask holding one filled disk.
pub fn disk_mask(width: usize, height: usize, center: (isize, isize), radius: isize) -> Image<u8> {
    let mut img = Image::new_fill(width, height, 0u8);
    fill_disk(&mut img, center, radius, ON);
    img
}

fn isqrt(v: isize) -> isize {
    if v <= 0 {
        return 0;
    }
    let mut r = (v as f64).sqrt() as isize;
    while r * r > v {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    r
}
