//! Nearest-neighbour lookup over small fixed-dimension point sets.
//!
//! Distances are Euclidean. When several points are equally near, the one
//! with the lowest id wins.

/// Point index answering nearest-neighbour queries.
pub trait SpatialIndex<const D: usize> {
    fn insert(&mut self, point: [f64; D], id: usize);

    /// `(distance, id)` of the closest point, `None` when empty.
    fn nearest(&self, query: [f64; D]) -> Option<(f64, usize)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn dist2<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn better(d2: f64, id: usize, best: Option<(f64, usize)>) -> bool {
    match best {
        None => true,
        Some((bd2, bid)) => d2 < bd2 || (d2 == bd2 && id < bid),
    }
}

/// Linear scan; the reference the tree is checked against.
#[derive(Debug, Clone, Default)]
pub struct BruteForce<const D: usize> {
    points: Vec<([f64; D], usize)>,
}

impl<const D: usize> BruteForce<D> {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }
}

impl<const D: usize> SpatialIndex<D> for BruteForce<D> {
    fn insert(&mut self, point: [f64; D], id: usize) {
        self.points.push((point, id));
    }

    fn nearest(&self, query: [f64; D]) -> Option<(f64, usize)> {
        let mut best = None;
        for (p, id) in &self.points {
            let d2 = dist2(p, &query);
            if better(d2, *id, best) {
                best = Some((d2, *id));
            }
        }
        best.map(|(d2, id)| (d2.sqrt(), id))
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Clone)]
struct KdNode<const D: usize> {
    point: [f64; D],
    id: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Arena-backed k-d tree built by successive insertion.
#[derive(Debug, Clone, Default)]
pub struct KdTree<const D: usize> {
    nodes: Vec<KdNode<D>>,
}

impl<const D: usize> KdTree<D> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Inserts the points in order, median-first, for a balanced tree.
    pub fn build(points: &[([f64; D], usize)]) -> Self {
        let mut tree = Self::new();
        let mut order: Vec<usize> = (0..points.len()).collect();
        // (slice range, depth) of pending subsets.
        let mut pending = vec![(0, order.len(), 0usize)];
        while let Some((lo, hi, depth)) = pending.pop() {
            if lo >= hi {
                continue;
            }
            let axis = depth % D.max(1);
            order[lo..hi].sort_by(|&a, &b| {
                points[a].0[axis]
                    .total_cmp(&points[b].0[axis])
                    .then(points[a].1.cmp(&points[b].1))
            });
            let mid = lo + (hi - lo) / 2;
            let (p, id) = points[order[mid]];
            tree.insert(p, id);
            pending.push((mid + 1, hi, depth + 1));
            pending.push((lo, mid, depth + 1));
        }
        tree
    }
}

impl<const D: usize> SpatialIndex<D> for KdTree<D> {
    fn insert(&mut self, point: [f64; D], id: usize) {
        let new = self.nodes.len();
        let mut axis = 0;
        let mut cur = if self.nodes.is_empty() { None } else { Some(0) };

        while let Some(i) = cur {
            let node = &self.nodes[i];
            axis = (node.axis + 1) % D.max(1);
            let go_left = point[node.axis] < node.point[node.axis];
            let next = if go_left { node.left } else { node.right };
            if next.is_none() {
                let node = &mut self.nodes[i];
                if go_left {
                    node.left = Some(new);
                } else {
                    node.right = Some(new);
                }
                break;
            }
            cur = next;
        }

        self.nodes.push(KdNode {
            point,
            id,
            axis,
            left: None,
            right: None,
        });
    }

    fn nearest(&self, query: [f64; D]) -> Option<(f64, usize)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<(f64, usize)> = None;
        let mut stack = vec![0usize];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            let d2 = dist2(&node.point, &query);
            if better(d2, node.id, best) {
                best = Some((d2, node.id));
            }

            let diff = query[node.axis] - node.point[node.axis];
            let (near, far) = if diff < 0.0 {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };

            // Ties must still be visited for the lowest-id rule.
            if let Some(f) = far
                && best.is_none_or(|(bd2, _)| diff * diff <= bd2)
            {
                stack.push(f);
            }
            if let Some(n) = near {
                stack.push(n);
            }
        }

        best.map(|(d2, id)| (d2.sqrt(), id))
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{BruteForce, KdTree, SpatialIndex};

    #[test]
    fn empty_index_has_no_neighbour() {
        assert!(KdTree::<2>::new().nearest([0.0, 0.0]).is_none());
        assert!(BruteForce::<3>::new().nearest([0.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn finds_nearest_in_three_dimensions() {
        let mut tree = KdTree::<3>::new();
        tree.insert([50.0, 50.0, 20.0], 0);
        tree.insert([150.0, 50.0, 20.0], 1);
        tree.insert([100.0, 120.0, 10.0], 2);

        let (d, id) = tree.nearest([140.0, 52.0, 18.0]).expect("non-empty");
        assert_eq!(id, 1);
        assert!((d - (100.0f64 + 4.0 + 4.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn exact_ties_resolve_to_lowest_id() {
        let mut tree = KdTree::<2>::new();
        tree.insert([10.0, 0.0], 3);
        tree.insert([-10.0, 0.0], 1);
        tree.insert([0.0, 10.0], 2);
        assert_eq!(tree.nearest([0.0, 0.0]).map(|(_, id)| id), Some(1));

        let mut brute = BruteForce::<2>::new();
        brute.insert([10.0, 0.0], 3);
        brute.insert([-10.0, 0.0], 1);
        assert_eq!(brute.nearest([0.0, 0.0]).map(|(_, id)| id), Some(1));
    }

    #[test]
    fn balanced_build_keeps_every_point() {
        let pts: Vec<([f64; 2], usize)> = (0..31)
            .map(|i| ([(i * 7 % 31) as f64, (i * 3 % 31) as f64], i))
            .collect();
        let tree = KdTree::build(&pts);
        assert_eq!(tree.len(), 31);
        for (p, id) in &pts {
            assert_eq!(tree.nearest(*p), Some((0.0, *id)));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tree_agrees_with_linear_scan(
            points in prop::collection::vec((0i32..40, 0i32..40, 1i32..10), 1..40),
            query in (0i32..40, 0i32..40, 1i32..10),
        ) {
            let mut tree = KdTree::<3>::new();
            let mut brute = BruteForce::<3>::new();
            for (id, &(x, y, r)) in points.iter().enumerate() {
                let p = [x as f64, y as f64, r as f64];
                tree.insert(p, id);
                brute.insert(p, id);
            }
            let q = [query.0 as f64, query.1 as f64, query.2 as f64];
            prop_assert_eq!(tree.nearest(q), brute.nearest(q));
        }
    }
}
