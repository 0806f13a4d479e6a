//! Element Tree Data - Pure DOP
//!
//! NO METHODS. Just data.

use crate::constants::NULL_INDEX;
use glam::{Vec2, Vec3};

/// Arena node of the element tree
///
/// While the binary tree is built, `child` and `right` own the two subtrees.
/// Relocation clears `right` and chains siblings through `next`; after linking
/// `next` is a traversal link only and may point outside the subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementNode {
    pub area: f32,
    pub position: Vec3,
    pub normal: Vec3,
    pub separator: Vec2,
    pub child: u32,
    pub right: u32,
    pub next: u32,
    /// Build-order index, set by the bottom-up update
    pub index: Option<u32>,
    /// Update pass that finalized the node (0 for leaves)
    pub height: Option<u32>,
}

impl ElementNode {
    pub const EMPTY: Self = Self {
        area: 0.0,
        position: Vec3::ZERO,
        normal: Vec3::ZERO,
        separator: Vec2::ZERO,
        child: NULL_INDEX,
        right: NULL_INDEX,
        next: NULL_INDEX,
        index: None,
        height: None,
    };
}

/// Outcome of the bisection median search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianSplit {
    pub value: f32,
    /// Elements strictly below `value`
    pub below: usize,
    pub iterations: u32,
    /// `below` hit floor(n/2) or ceil(n/2) within the budget
    pub converged: bool,
}

/// Counts produced by the bottom-up update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementSummary {
    pub total_elements: u32,
    pub leaf_count: u32,
    pub max_height: u32,
}

/// Linked and aggregated element forest
///
/// The arena may hold unreachable nodes (interior nodes dropped by
/// relocation); only nodes reachable from `head` count.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementForest {
    pub nodes: Vec<ElementNode>,
    /// `NULL_INDEX` when the mesh has no vertices
    pub head: u32,
    pub summary: ElementSummary,
}
