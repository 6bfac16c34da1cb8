use std::collections::HashMap;

use crate::error::PackError;
use crate::tree::arena::{FreeTree, NodeId};

use super::{Layout, PlacedRect, RectSpec};

/// Options of a packing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackOptions {
    /// Clearance added to both sides of every rectangle when probing and splitting
    pub margin: f32,
    /// Probe the rotated footprint first and rotate whenever it fits
    pub allow_rotation: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            margin: 5.0,
            allow_rotation: true,
        }
    }
}

/// Where one rectangle went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub node: NodeId,
    pub w: f32,
    pub h: f32,
    pub rotated: bool,
}

/// Place a single `width` x `height` rectangle into the tree.
///
/// Orientation is decided once: if the rotated footprint fits anywhere the
/// rectangle is rotated, regardless of which orientation wastes less space.
/// Returns `None` without touching the tree when nothing fits.
pub fn place(tree: &mut FreeTree, width: f32, height: f32, options: &PackOptions) -> Option<Placement> {
    let m = options.margin;
    let (mut w, mut h) = (width, height);
    let mut rotated = false;

    if options.allow_rotation && tree.find(h + m, w + m).is_some() {
        std::mem::swap(&mut w, &mut h);
        rotated = w != h;
    }

    let node = tree.find(w + m, h + m)?;
    tree.split_node(node, w + m, h + m);

    Some(Placement { node, w, h, rotated })
}

/// Pack `rects` in input order into a fresh `width` x `height` container.
///
/// Each placement narrows the tree for the next one. The pass is atomic:
/// the first rectangle that fits nowhere aborts it and nothing is returned.
pub fn pack(width: f32, height: f32, rects: &[RectSpec], options: &PackOptions) -> Result<Layout, PackError> {
    let mut tree = FreeTree::new(width, height);
    let mut placed = Vec::with_capacity(rects.len());
    let mut node_to_rect = HashMap::with_capacity(rects.len());

    for (index, spec) in rects.iter().enumerate() {
        let Some(p) = place(&mut tree, spec.width, spec.height, options) else {
            tracing::warn!(
                "Packing failed at rectangle {} ({}x{}) after {} placements",
                index,
                spec.width,
                spec.height,
                placed.len()
            );
            return Err(PackError::Infeasible {
                index,
                width: spec.width,
                height: spec.height,
                margin: options.margin,
            });
        };

        let origin = tree.get(p.node).region;
        tracing::debug!(
            "  [{}] '{}' {}x{} at ({}, {}){}",
            index,
            spec.label,
            p.w,
            p.h,
            origin.x,
            origin.y,
            if p.rotated { " rotated" } else { "" }
        );

        node_to_rect.insert(p.node, placed.len());
        placed.push(PlacedRect {
            index,
            label: spec.label.clone(),
            x: origin.x,
            y: origin.y,
            w: p.w,
            h: p.h,
            rotated: p.rotated,
            node: p.node,
        });
    }

    Ok(Layout {
        rects: placed,
        node_to_rect,
        tree,
        margin: options.margin,
    })
}
