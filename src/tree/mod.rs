pub mod arena;
pub mod partition;

use self::arena::{FreeTree, NodeId, Region};

impl FreeTree {
    /// Find a free region that can hold a `width` x `height` footprint.
    ///
    /// Depth-first walk, right subtree before bottom subtree; the first free
    /// node that fits wins. There is no best-fit comparison by leftover area,
    /// so utilization is worse than best-fit or guillotine-with-merge packers.
    /// Rotation is never tried here; callers probe both orientations.
    ///
    /// `None` as the start node returns `None`.
    pub fn find_node(&self, node: Option<NodeId>, width: f32, height: f32) -> Option<NodeId> {
        let id = node?;
        let current = self.get(id);
        if current.occupied {
            self.find_node(current.right, width, height)
                .or_else(|| self.find_node(current.bottom, width, height))
        } else if current.region.fits(width, height) {
            Some(id)
        } else {
            None
        }
    }

    /// `find_node` starting at the root.
    pub fn find(&self, width: f32, height: f32) -> Option<NodeId> {
        self.find_node(Some(self.root), width, height)
    }

    /// Commit a `width` x `height` footprint at the origin of a free node.
    ///
    /// Shelf split: the right child is only as tall as the footprint, the
    /// bottom child spans the full node width. Returns `(right, bottom)`.
    /// The caller guarantees the footprint fits (normally by splitting a node
    /// returned from [`FreeTree::find_node`]).
    pub fn split_node(&mut self, id: NodeId, width: f32, height: f32) -> (NodeId, NodeId) {
        let region = self.get(id).region;
        debug_assert!(!self.get(id).occupied, "split of occupied node {:?}", id);
        debug_assert!(region.fits(width, height), "split footprint exceeds node {:?}", id);

        let right = self.push_free(Region::new(
            region.x + width,
            region.y,
            region.w - width,
            height,
        ));
        let bottom = self.push_free(Region::new(
            region.x,
            region.y + height,
            region.w,
            region.h - height,
        ));

        let node = self.get_mut(id);
        node.occupied = true;
        node.right = Some(right);
        node.bottom = Some(bottom);
        (right, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::arena::{FreeTree, NodeId, Region};

    #[test]
    fn free_node_matches_iff_both_dimensions_fit() {
        let tree = FreeTree::new(40.0, 20.0);
        assert_eq!(tree.find(40.0, 20.0), Some(tree.root));
        assert_eq!(tree.find(10.0, 5.0), Some(tree.root));
        assert_eq!(tree.find(40.5, 20.0), None);
        assert_eq!(tree.find(40.0, 20.5), None);
        // No implicit rotation
        assert_eq!(tree.find(20.0, 40.0), None);
    }

    #[test]
    fn null_start_node_returns_none() {
        let tree = FreeTree::new(10.0, 10.0);
        assert_eq!(tree.find_node(None, 1.0, 1.0), None);
    }

    #[test]
    fn split_produces_shelf_children() {
        let mut tree = FreeTree::new(100.0, 80.0);
        let root = tree.root;
        let (right, bottom) = tree.split_node(root, 30.0, 20.0);

        assert!(tree.get(root).occupied);
        assert_eq!(tree.get(right).region, Region::new(30.0, 0.0, 70.0, 20.0));
        assert_eq!(tree.get(bottom).region, Region::new(0.0, 20.0, 100.0, 60.0));
        assert!(!tree.get(right).occupied);
        assert!(!tree.get(bottom).occupied);
        assert_eq!(tree.children(root), Some((right, bottom)));
    }

    #[test]
    fn search_prefers_right_subtree_first() {
        let mut tree = FreeTree::new(100.0, 100.0);
        let (right, bottom) = tree.split_node(tree.root, 50.0, 50.0);
        // right is 50x50, bottom is 100x50: both fit these, right wins
        assert_eq!(tree.find(10.0, 10.0), Some(right));
        assert_eq!(tree.find(10.0, 50.0), Some(right));
        // Neither child is tall enough
        assert_eq!(tree.find(10.0, 60.0), None);
        // Too wide for right, only bottom fits
        assert_eq!(tree.find(60.0, 10.0), Some(bottom));
        assert_eq!(tree.find(100.0, 50.0), Some(bottom));
    }

    #[test]
    fn first_structural_match_wins_over_tighter_fit() {
        let mut tree = FreeTree::new(100.0, 100.0);
        let (right, _bottom) = tree.split_node(tree.root, 10.0, 90.0);
        // right is 90x90, bottom is 100x10: a 90x10 request fits bottom exactly
        // but the right subtree is searched first.
        assert_eq!(tree.find(90.0, 10.0), Some(right));
    }

    #[test]
    fn search_descends_into_nested_occupied_nodes() {
        let mut tree = FreeTree::new(100.0, 100.0);
        let (right, bottom) = tree.split_node(tree.root, 40.0, 40.0);
        let (rr, rb) = tree.split_node(right, 60.0, 40.0);
        // rr is 0 wide, rb is 0 tall; the only usable space is `bottom`
        assert_eq!(tree.get(rr).region.w, 0.0);
        assert_eq!(tree.get(rb).region.h, 0.0);
        assert_eq!(tree.find(5.0, 5.0), Some(bottom));
        assert_eq!(tree.find(0.0, 0.0), Some(rr));
        assert_ne!(tree.find(5.0, 5.0), Some(NodeId(0)));
    }
}
