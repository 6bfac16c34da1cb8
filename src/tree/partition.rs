use super::arena::{FreeTree, NodeId, Region};

/// Tolerance for float comparisons of region edges.
pub const EDGE_EPS: f32 = 1e-3;

/// A broken partition at one occupied node.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Occupied node without both children
    MissingChild(NodeId),
    /// A child reaches outside its parent
    ChildOutsideParent { parent: NodeId, child: NodeId },
    /// Right and bottom children overlap
    SiblingOverlap { parent: NodeId },
    /// A child overlaps the placed footprint
    FootprintOverlap { parent: NodeId, child: NodeId },
    /// footprint + right + bottom does not add up to the parent area
    AreaMismatch { parent: NodeId, expected: f64, actual: f64 },
}

/// The footprint committed at an occupied node, recovered from its right child:
/// the right child starts where the footprint ends and is exactly as tall.
pub fn footprint(tree: &FreeTree, id: NodeId) -> Option<Region> {
    let node = tree.get(id);
    let right = tree.get(node.right?).region;
    Some(Region::new(
        node.region.x,
        node.region.y,
        right.x - node.region.x,
        right.h,
    ))
}

/// Check the partition invariant on every occupied node.
/// Returns every violation found; empty means the tree is consistent.
pub fn check(tree: &FreeTree) -> Vec<Violation> {
    let mut violations = Vec::new();

    for id in tree.occupied() {
        let Some((right_id, bottom_id)) = tree.children(id) else {
            violations.push(Violation::MissingChild(id));
            continue;
        };
        let parent = tree.get(id).region;
        let right = tree.get(right_id).region;
        let bottom = tree.get(bottom_id).region;

        for child in [right_id, bottom_id] {
            if !parent.contains(&tree.get(child).region, EDGE_EPS) {
                violations.push(Violation::ChildOutsideParent { parent: id, child });
            }
        }

        if right.intersects(&bottom, EDGE_EPS) {
            violations.push(Violation::SiblingOverlap { parent: id });
        }

        let Some(placed) = footprint(tree, id) else {
            continue;
        };
        for child in [right_id, bottom_id] {
            if placed.intersects(&tree.get(child).region, EDGE_EPS) {
                violations.push(Violation::FootprintOverlap { parent: id, child });
            }
        }

        let expected = parent.area();
        let actual = placed.area() + right.area() + bottom.area();
        let tolerance = (expected.abs() * 1e-6).max(1e-3);
        if (expected - actual).abs() > tolerance {
            violations.push(Violation::AreaMismatch {
                parent: id,
                expected,
                actual,
            });
        }
    }

    violations
}

/// Sum of all free leaf areas.
pub fn free_area(tree: &FreeTree) -> f64 {
    tree.free_leaves().map(|id| tree.get(id).region.area()).sum()
}

/// Sum of all committed footprints.
pub fn occupied_area(tree: &FreeTree) -> f64 {
    tree.occupied()
        .filter_map(|id| footprint(tree, id))
        .map(|r| r.area())
        .sum()
}
