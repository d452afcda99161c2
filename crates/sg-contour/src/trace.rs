//! Topological border following (Suzuki & Abe, 1985).
//!
//! Foreground is 8-connected, background 4-connected. Each border receives a
//! sequential number `nbd >= 2` in raster order of its starting pixel; the
//! image frame is border `1` and behaves like a hole border with no parent.

use sg_core::ImageView;

use crate::forest::{ContourForest, RawBorder};

// Counter-clockwise on screen, starting east (y grows downwards).
const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const EAST: usize = 0;
const WEST: usize = 4;
const FRAME: usize = 1;

/// Traces every outer and hole border of `mask` (pixels `> 0` are set).
pub fn find_contours(mask: &ImageView<'_, u8>) -> ContourForest {
    let (w, h) = (mask.width(), mask.height());
    if w == 0 || h == 0 {
        return ContourForest::from_raw(Vec::new());
    }

    let pw = w + 2;
    let ph = h + 2;
    let mut f = vec![0i32; pw * ph];
    for y in 0..h {
        for (x, &v) in mask.row(y).iter().enumerate() {
            if v != 0 {
                f[(y + 1) * pw + x + 1] = 1;
            }
        }
    }

    let offsets: [isize; 8] = core::array::from_fn(|d| DY[d] * pw as isize + DX[d]);

    // Indexed by border number; entries 0 (unused) and 1 (frame) are fixed.
    let mut is_hole = vec![false, true];
    let mut parent_of = vec![0usize, 0];
    let mut borders = Vec::new();
    let mut nbd = FRAME as i32;

    for y in 1..ph - 1 {
        let mut lnbd = FRAME;
        for x in 1..pw - 1 {
            let idx = y * pw + x;
            let fij = f[idx];
            if fij == 0 {
                continue;
            }

            let start = if fij == 1 && f[idx - 1] == 0 {
                Some((false, WEST))
            } else if fij >= 1 && f[idx + 1] == 0 {
                if fij > 1 {
                    lnbd = fij as usize;
                }
                Some((true, EAST))
            } else {
                None
            };

            if let Some((hole, from_dir)) = start {
                nbd += 1;
                let parent = if hole == is_hole[lnbd] {
                    parent_of[lnbd]
                } else {
                    lnbd
                };
                is_hole.push(hole);
                parent_of.push(parent);

                let chain = follow(&mut f, &offsets, idx, from_dir, nbd);
                let points = chain
                    .into_iter()
                    .map(|p| ((p % pw) as i32 - 1, (p / pw) as i32 - 1))
                    .collect();

                borders.push(RawBorder {
                    points,
                    is_hole: hole,
                    parent: (parent > FRAME).then(|| parent - 2),
                });
            }

            let v = f[idx];
            if v != 0 && v != 1 {
                lnbd = v.unsigned_abs() as usize;
            }
        }
    }

    ContourForest::from_raw(borders)
}

/// Follows one border starting at `start`, whose zero neighbour lies in
/// direction `from_dir`. Returns padded linear indices of the chain.
fn follow(f: &mut [i32], offsets: &[isize; 8], start: usize, from_dir: usize, nbd: i32) -> Vec<usize> {
    let step = |p: usize, d: usize| (p as isize + offsets[d]) as usize;

    // Clockwise search for the first set neighbour.
    let mut first = None;
    for k in 0..8 {
        let d = (from_dir + 8 - k) % 8;
        let q = step(start, d);
        if f[q] != 0 {
            first = Some(q);
            break;
        }
    }

    let Some(first) = first else {
        f[start] = -nbd;
        return vec![start];
    };

    let mut chain = Vec::new();
    let mut prev = first;
    let mut cur = start;
    loop {
        let back = direction(offsets, cur, prev);

        // Counter-clockwise search starting after the previous pixel.
        let mut east_zero = false;
        let mut next = prev;
        for k in 1..=8 {
            let d = (back + k) % 8;
            let q = step(cur, d);
            if f[q] != 0 {
                next = q;
                break;
            }
            if d == EAST {
                east_zero = true;
            }
        }

        if east_zero {
            f[cur] = -nbd;
        } else if f[cur] == 1 {
            f[cur] = nbd;
        }
        chain.push(cur);

        if next == start && cur == first {
            break;
        }
        prev = cur;
        cur = next;
    }

    chain
}

fn direction(offsets: &[isize; 8], from: usize, to: usize) -> usize {
    let delta = to as isize - from as isize;
    offsets
        .iter()
        .position(|&o| o == delta)
        .expect("traced pixels are 8-neighbours")
}

#[cfg(test)]
mod tests {
    use sg_core::Image;

    use super::find_contours;

    fn mask_from_rows(rows: &[&str]) -> Image<u8> {
        let w = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| if b == b'#' { 255u8 } else { 0 }))
            .collect();
        Image::from_vec(w, rows.len(), data).expect("rectangular rows")
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let img = Image::new_fill(6, 4, 0u8);
        assert!(find_contours(&img.as_view()).is_empty());
    }

    #[test]
    fn single_pixel_is_one_point_contour() {
        let img = mask_from_rows(&["...", ".#.", "..."]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 1);
        let c = forest.get(0).expect("one contour");
        assert_eq!(c.points, vec![(1, 1)]);
        assert!(!c.is_hole);
        assert_eq!(c.parent, None);
    }

    #[test]
    fn square_outline_traces_every_boundary_pixel() {
        let img = mask_from_rows(&[".....", ".###.", ".###.", ".###.", "....."]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 1);
        let c = forest.get(0).expect("one contour");
        assert_eq!(c.points.len(), 8);
        assert_eq!(c.points[0], (1, 1));
        assert!(!c.points.contains(&(2, 2)));
    }

    #[test]
    fn ring_yields_outer_and_hole() {
        let img = mask_from_rows(&[
            ".......", //
            ".#####.", //
            ".#...#.", //
            ".#...#.", //
            ".#...#.", //
            ".#####.", //
            ".......",
        ]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 2);

        let outer = forest.get(0).expect("outer");
        let hole = forest.get(1).expect("hole");
        assert!(!outer.is_hole);
        assert!(hole.is_hole);
        assert_eq!(hole.parent, Some(0));
        assert_eq!(outer.first_child, Some(1));
    }

    #[test]
    fn nested_blob_inside_hole_is_grandchild() {
        let img = mask_from_rows(&[
            ".........", //
            ".#######.", //
            ".#.....#.", //
            ".#.###.#.", //
            ".#.###.#.", //
            ".#.###.#.", //
            ".#.....#.", //
            ".#######.", //
            ".........",
        ]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 3);
        let inner = forest.get(2).expect("inner blob");
        assert!(!inner.is_hole);
        assert_eq!(inner.parent, Some(1));
        assert_eq!(forest.depth(2), 2);
    }

    #[test]
    fn diagonal_pixels_form_one_component() {
        let img = mask_from_rows(&["#...", ".#..", "..#.", "...#"]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(0).expect("one").points.len(), 6);
    }

    #[test]
    fn side_by_side_blobs_are_sibling_roots() {
        let img = mask_from_rows(&["##..##", "##..##"]);
        let forest = find_contours(&img.as_view());
        assert_eq!(forest.len(), 2);
        let roots: Vec<_> = forest.roots().collect();
        assert_eq!(roots, vec![0, 1]);
        assert_eq!(forest.get(0).expect("first").next_sibling, Some(1));
        assert_eq!(forest.get(1).expect("second").prev_sibling, Some(0));
    }
}
