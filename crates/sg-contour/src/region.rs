//! Rasterization of contour interiors.

use sg_core::Image;

use crate::forest::Contour;

const ON: u8 = 255;

/// Marks the boundary and interior of `contour` in `dst`.
///
/// The interior is everything the outside cannot reach through 4-connected
/// steps without crossing a boundary pixel, evaluated within the contour's
/// bounding box.
pub fn fill_contour_into(dst: &mut Image<u8>, contour: &Contour) {
    let Some((x0, y0, x1, y1)) = contour.bounds() else {
        return;
    };

    // Local canvas with a one-pixel margin that is always outside.
    let lw = (x1 - x0 + 3) as usize;
    let lh = (y1 - y0 + 3) as usize;
    const OPEN: u8 = 0;
    const WALL: u8 = 1;
    const OUTSIDE: u8 = 2;

    let mut local = vec![OPEN; lw * lh];
    for &(x, y) in &contour.points {
        let lx = (x - x0 + 1) as usize;
        let ly = (y - y0 + 1) as usize;
        local[ly * lw + lx] = WALL;
    }

    let mut stack = vec![0usize];
    local[0] = OUTSIDE;
    while let Some(i) = stack.pop() {
        let (x, y) = (i % lw, i / lw);
        let mut visit = |j: usize| {
            if local[j] == OPEN {
                local[j] = OUTSIDE;
                stack.push(j);
            }
        };
        if x > 0 {
            visit(i - 1);
        }
        if x + 1 < lw {
            visit(i + 1);
        }
        if y > 0 {
            visit(i - lw);
        }
        if y + 1 < lh {
            visit(i + lw);
        }
    }

    for ly in 1..lh - 1 {
        for lx in 1..lw - 1 {
            if local[ly * lw + lx] == OUTSIDE {
                continue;
            }
            let x = lx as isize - 1 + x0 as isize;
            let y = ly as isize - 1 + y0 as isize;
            if let Some(i) = dst.index_of(x, y) {
                dst.data_mut()[i] = ON;
            }
        }
    }
}

/// A `width x height` mask with the filled interior of `contour`.
pub fn fill_contour(width: usize, height: usize, contour: &Contour) -> Image<u8> {
    let mut out = Image::new_fill(width, height, 0u8);
    fill_contour_into(&mut out, contour);
    out
}
