/// Index into the arena `Vec<FreeNode>`. Uses u32 like every other id in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Axis-aligned region in container-local coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w as f64 * self.h as f64
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Whether a `w` x `h` footprint fits inside this region without rotation.
    pub fn fits(&self, w: f32, h: f32) -> bool {
        w <= self.w && h <= self.h
    }

    /// Whether `other` lies entirely inside this region, within `eps`.
    pub fn contains(&self, other: &Region, eps: f32) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Whether the interiors of the two regions overlap. Touching edges and
    /// zero-sized regions never count as overlap.
    pub fn intersects(&self, other: &Region, eps: f32) -> bool {
        if self.w <= eps || self.h <= eps || other.w <= eps || other.h <= eps {
            return false;
        }
        self.x + eps < other.right()
            && other.x + eps < self.right()
            && self.y + eps < other.bottom()
            && other.y + eps < self.bottom()
    }
}

/// A single region of the container, stored in a flat arena.
/// Free nodes are placement candidates; occupied nodes own exactly two children.
#[derive(Debug, Clone)]
pub struct FreeNode {
    pub region: Region,
    /// Set once a rectangle has been committed to this region
    pub occupied: bool,
    /// Horizontal remainder, as tall as the placed rectangle (None while free)
    pub right: Option<NodeId>,
    /// Vertical remainder, full node width (None while free)
    pub bottom: Option<NodeId>,
}

impl FreeNode {
    fn free(region: Region) -> Self {
        Self {
            region,
            occupied: false,
            right: None,
            bottom: None,
        }
    }
}

/// The free-space tree stored as a flat arena of nodes.
/// Children are always pushed after their parent, so `nodes[0]` is the root
/// and every child index is greater than its parent's.
#[derive(Debug, Clone)]
pub struct FreeTree {
    pub nodes: Vec<FreeNode>,
    pub root: NodeId,
}

impl FreeTree {
    /// Create a tree whose single free root covers the whole container.
    pub fn new(width: f32, height: f32) -> Self {
        FreeTree {
            nodes: vec![FreeNode::free(Region::new(0.0, 0.0, width, height))],
            root: NodeId(0),
        }
    }

    /// Append a free node and return its id.
    pub(crate) fn push_free(&mut self, region: Region) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FreeNode::free(region));
        id
    }

    pub fn get(&self, id: NodeId) -> &FreeNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut FreeNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been placed yet (only the free root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1 && !self.nodes[self.root.index()].occupied
    }

    /// The container region (the root's geometry).
    pub fn bounds(&self) -> Region {
        self.get(self.root).region
    }

    /// `(right, bottom)` children of an occupied node.
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        let node = self.get(id);
        match (node.right, node.bottom) {
            (Some(r), Some(b)) => Some((r, b)),
            _ => None,
        }
    }

    /// Iterate over all free (placeable) leaves in arena order.
    pub fn free_leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.occupied)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Iterate over all occupied nodes in arena order (placement order).
    pub fn occupied(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.occupied)
            .map(|(i, _)| NodeId(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_single_free_root() {
        let tree = FreeTree::new(200.0, 100.0);
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.bounds(), Region::new(0.0, 0.0, 200.0, 100.0));
        assert!(tree.children(tree.root).is_none());
        assert_eq!(tree.free_leaves().collect::<Vec<_>>(), vec![tree.root]);
    }

    #[test]
    fn touching_regions_do_not_intersect() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(10.0, 0.0, 10.0, 10.0);
        let c = Region::new(5.0, 5.0, 10.0, 10.0);
        assert!(!a.intersects(&b, 0.0));
        assert!(a.intersects(&c, 0.0));
        assert!(!a.intersects(&Region::new(5.0, 5.0, 0.0, 3.0), 0.0));
    }
}
