//! Minimum enclosing circle (Welzl), evaluated iteratively.

use sg_core::{Circle, Point2f};

use crate::forest::PixelPoint;

const EPS: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
struct Disk {
    x: f64,
    y: f64,
    r: f64,
}

impl Disk {
    fn covers(&self, p: (f64, f64)) -> bool {
        let (dx, dy) = (p.0 - self.x, p.1 - self.y);
        (dx * dx + dy * dy).sqrt() <= self.r + EPS * (1.0 + self.r)
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let (x, y) = ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5);
        let r = ((a.0 - x).powi(2) + (a.1 - y).powi(2)).sqrt();
        Self { x, y, r }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < EPS {
            // Collinear: the widest pair spans the circle.
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .fold(Self::from_two(a, b), |best, cand| if cand.r > best.r { cand } else { best });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            x: a.0 + ux,
            y: a.1 + uy,
            r: (ux * ux + uy * uy).sqrt(),
        }
    }
}

/// Smallest circle containing every point, or `None` for an empty set.
///
/// Points are visited in a fixed pseudo-random order, so the result is
/// reproducible and the expected running time stays linear.
pub fn min_enclosing_circle(points: &[PixelPoint]) -> Option<Circle> {
    let mut pts: Vec<(f64, f64)> = points.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
    if pts.is_empty() {
        return None;
    }
    shuffle(&mut pts);

    let mut disk = Disk {
        x: pts[0].0,
        y: pts[0].1,
        r: 0.0,
    };
    for i in 1..pts.len() {
        if disk.covers(pts[i]) {
            continue;
        }
        disk = Disk {
            x: pts[i].0,
            y: pts[i].1,
            r: 0.0,
        };
        for j in 0..i {
            if disk.covers(pts[j]) {
                continue;
            }
            disk = Disk::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !disk.covers(pts[k]) {
                    disk = Disk::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Some(Circle::new(
        Point2f::new(disk.x as f32, disk.y as f32),
        disk.r as f32,
    ))
}

/// Fisher-Yates driven by a fixed-seed xorshift generator.
fn shuffle<T>(items: &mut [T]) {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for i in (1..items.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::min_enclosing_circle;

    #[test]
    fn empty_and_single_point() {
        assert!(min_enclosing_circle(&[]).is_none());
        let c = min_enclosing_circle(&[(4, 7)]).expect("one point");
        assert_eq!((c.center.x, c.center.y, c.radius), (4.0, 7.0, 0.0));
    }

    #[test]
    fn square_corners_define_circumcircle() {
        let c = min_enclosing_circle(&[(0, 0), (10, 0), (10, 10), (0, 10), (5, 5)])
            .expect("non-empty");
        assert!((c.center.x - 5.0).abs() < 1e-4);
        assert!((c.center.y - 5.0).abs() < 1e-4);
        assert!((c.radius - 50f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn collinear_points_use_extreme_pair() {
        let c = min_enclosing_circle(&[(0, 3), (2, 3), (8, 3), (5, 3)]).expect("non-empty");
        assert!((c.center.x - 4.0).abs() < 1e-5);
        assert!((c.radius - 4.0).abs() < 1e-5);
    }

    #[test]
    fn every_point_is_covered() {
        let pts: Vec<(i32, i32)> = (0..60)
            .map(|i| {
                let t = i as f64 * 0.37;
                ((20.0 + 13.0 * t.cos()) as i32, (30.0 + 7.0 * (1.3 * t).sin()) as i32)
            })
            .collect();
        let c = min_enclosing_circle(&pts).expect("non-empty");
        for &(x, y) in &pts {
            let d = ((x as f32 - c.center.x).powi(2) + (y as f32 - c.center.y).powi(2)).sqrt();
            assert!(d <= c.radius + 1e-3);
        }
        let again = min_enclosing_circle(&pts).expect("non-empty");
        assert_eq!(c, again);
    }
}
