use sg_core::Image;

/// 4-connected flood fill from `seed`.
///
/// Every pixel connected to the seed that holds the seed's original value is
/// overwritten with `value`. Pixels set in `barrier` are never entered. The
/// fill is a no-op when the seed is outside the image, blocked by the barrier,
/// or already holds `value`. Returns the number of pixels written.
pub fn flood_fill(
    img: &mut Image<u8>,
    seed: (isize, isize),
    value: u8,
    barrier: Option<&Image<u8>>,
) -> usize {
    if let Some(b) = barrier {
        assert_eq!(b.width(), img.width(), "barrier width must match");
        assert_eq!(b.height(), img.height(), "barrier height must match");
    }

    let Some(start) = img.index_of(seed.0, seed.1) else {
        return 0;
    };
    let blocked = |i: usize| barrier.is_some_and(|b| b.data()[i] != 0);
    if blocked(start) {
        return 0;
    }

    let target = img.data()[start];
    if target == value {
        return 0;
    }

    let w = img.width();
    let h = img.height();
    let data = img.data_mut();
    let mut stack = vec![start];
    data[start] = value;
    let mut written = 1;

    while let Some(p) = stack.pop() {
        let (x, y) = (p % w, p / w);
        let mut visit = |q: usize, stack: &mut Vec<usize>| {
            if data[q] == target && !blocked(q) {
                data[q] = value;
                written += 1;
                stack.push(q);
            }
        };
        if x > 0 {
            visit(p - 1, &mut stack);
        }
        if x + 1 < w {
            visit(p + 1, &mut stack);
        }
        if y > 0 {
            visit(p - w, &mut stack);
        }
        if y + 1 < h {
            visit(p + w, &mut stack);
        }
    }

    written
}
