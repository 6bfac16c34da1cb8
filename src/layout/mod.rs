pub mod shelf;

use std::collections::HashMap;

use compact_str::CompactString;

use crate::tree::arena::{FreeTree, NodeId, Region};

pub use shelf::{pack, PackOptions};

/// A placement request: declared size in container units, plus an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct RectSpec {
    pub label: CompactString,
    pub width: f32,
    pub height: f32,
}

impl RectSpec {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            label: CompactString::default(),
            width,
            height,
        }
    }

    pub fn labeled(label: &str, width: f32, height: f32) -> Self {
        Self {
            label: CompactString::new(label),
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// A positioned rectangle. `w`/`h` are the effective (possibly rotated) size,
/// without margin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect {
    /// Position in the input sequence
    pub index: usize,
    pub label: CompactString,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Whether width and height were swapped relative to the request
    pub rotated: bool,
    /// Tree node the rectangle was committed to
    pub node: NodeId,
}

impl PlacedRect {
    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.w, self.h)
    }

    /// Region including the clearance margin on the right and bottom edges.
    pub fn footprint(&self, margin: f32) -> Region {
        Region::new(self.x, self.y, self.w + margin, self.h + margin)
    }
}

/// The full result of a packing pass (rects in input order + the final tree).
#[derive(Debug, Clone)]
pub struct Layout {
    pub rects: Vec<PlacedRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
    pub tree: FreeTree,
    pub margin: f32,
}

impl Layout {
    pub fn container(&self) -> Region {
        self.tree.bounds()
    }

    /// Placed area (without margins) divided by container area.
    pub fn coverage(&self) -> f64 {
        let total = self.container().area();
        if total <= 0.0 {
            return 0.0;
        }
        self.rects.iter().map(|r| r.region().area()).sum::<f64>() / total
    }

    /// Index pairs whose margin-inflated footprints overlap. Empty for any
    /// layout produced by [`pack`].
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.rects.iter().enumerate() {
            let fa = a.footprint(self.margin);
            for b in &self.rects[i + 1..] {
                if fa.intersects(&b.footprint(self.margin), 0.0) {
                    pairs.push((a.index, b.index));
                }
            }
        }
        pairs
    }

    /// Indices of rectangles that reach outside the container.
    pub fn out_of_bounds(&self) -> Vec<usize> {
        let container = self.container();
        self.rects
            .iter()
            .filter(|r| !container.contains(&r.region(), 0.0))
            .map(|r| r.index)
            .collect()
    }

    /// Look up the rectangle committed to a tree node.
    pub fn rect_at(&self, node: NodeId) -> Option<&PlacedRect> {
        self.node_to_rect.get(&node).map(|&i| &self.rects[i])
    }
}
