//! Arena-backed contour hierarchy.
//!
//! Contours are addressed by their index in tracing order. Links between
//! contours are plain indices so the forest can be walked with an explicit
//! stack, independent of nesting depth.

pub type ContourId = usize;

/// Pixel coordinate of a contour point, `(x, y)`.
pub type PixelPoint = (i32, i32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub id: ContourId,
    /// Closed chain of boundary pixels; the last point is adjacent to the first.
    pub points: Vec<PixelPoint>,
    pub is_hole: bool,
    pub parent: Option<ContourId>,
    pub first_child: Option<ContourId>,
    pub prev_sibling: Option<ContourId>,
    pub next_sibling: Option<ContourId>,
}

impl Contour {
    /// Inclusive bounding box `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let (&(x0, y0), rest) = self.points.split_first()?;
        Some(rest.iter().fold((x0, y0, x0, y0), |(ax, ay, bx, by), &(x, y)| {
            (ax.min(x), ay.min(y), bx.max(x), by.max(y))
        }))
    }
}

#[derive(Debug)]
pub(crate) struct RawBorder {
    pub points: Vec<PixelPoint>,
    pub is_hole: bool,
    pub parent: Option<ContourId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContourForest {
    contours: Vec<Contour>,
    first_root: Option<ContourId>,
}

impl ContourForest {
    /// Links raw borders (in tracing order, parents before children) into
    /// sibling chains that preserve discovery order.
    pub(crate) fn from_raw(raw: Vec<RawBorder>) -> Self {
        let mut contours: Vec<Contour> = Vec::with_capacity(raw.len());
        let mut last_child: Vec<Option<ContourId>> = Vec::with_capacity(raw.len());
        let mut first_root = None;
        let mut last_root: Option<ContourId> = None;

        for (id, border) in raw.into_iter().enumerate() {
            let prev = match border.parent {
                Some(p) => last_child[p],
                None => last_root,
            };

            contours.push(Contour {
                id,
                points: border.points,
                is_hole: border.is_hole,
                parent: border.parent,
                first_child: None,
                prev_sibling: prev,
                next_sibling: None,
            });
            last_child.push(None);

            match prev {
                Some(s) => contours[s].next_sibling = Some(id),
                None => match border.parent {
                    Some(p) => contours[p].first_child = Some(id),
                    None => first_root = Some(id),
                },
            }
            match border.parent {
                Some(p) => last_child[p] = Some(id),
                None => last_root = Some(id),
            }
        }

        Self {
            contours,
            first_root,
        }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn get(&self, id: ContourId) -> Option<&Contour> {
        self.contours.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    /// Top-level contours (no enclosing contour), in discovery order.
    pub fn roots(&self) -> Siblings<'_> {
        Siblings {
            forest: self,
            next: self.first_root,
        }
    }

    pub fn children(&self, id: ContourId) -> Siblings<'_> {
        Siblings {
            forest: self,
            next: self.get(id).and_then(|c| c.first_child),
        }
    }

    /// Outer borders only (holes skipped), in discovery order.
    pub fn outer(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| !c.is_hole)
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: ContourId) -> usize {
        let mut depth = 0;
        let mut cur = self.get(id).and_then(|c| c.parent);
        while let Some(p) = cur {
            depth += 1;
            cur = self.contours[p].parent;
        }
        depth
    }

    /// Depth-first pre-order over the whole forest.
    pub fn preorder(&self) -> Vec<ContourId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<ContourId> = self.roots().collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            stack.extend(self.children(id));
            stack[start..].reverse();
        }
        out
    }
}

/// Iterator over a sibling chain.
pub struct Siblings<'a> {
    forest: &'a ContourForest,
    next: Option<ContourId>,
}

impl Iterator for Siblings<'_> {
    type Item = ContourId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.forest.contours.get(id).and_then(|c| c.next_sibling);
        Some(id)
    }
}
