//! Disk Tree Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in disk_operations.rs

use crate::constants::NULL_INDEX;
use glam::Vec3;

/// Arena node of the disk tree. Links are arena indices, `NULL_INDEX` if absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    /// Surface area covered (not divided by pi)
    pub area: f32,
    pub parent_index: u32,
    /// Node to visit once this subtree is done
    pub next_index: u32,
    pub left_child_index: u32,
    pub right_child_index: u32,
    pub centroid: Vec3,
    pub normal: Vec3,
}

impl Disk {
    pub const EMPTY: Self = Self {
        area: 0.0,
        parent_index: NULL_INDEX,
        next_index: NULL_INDEX,
        left_child_index: NULL_INDEX,
        right_child_index: NULL_INDEX,
        centroid: Vec3::ZERO,
        normal: Vec3::ZERO,
    };
}

/// Finished disk tree
#[derive(Debug, Clone, PartialEq)]
pub struct DiskTree {
    /// Leaves at 0..face_count, interior disks after
    pub disks: Vec<Disk>,
    /// `NULL_INDEX` for an empty mesh
    pub root_index: u32,
    pub face_count: u32,
    pub max_depth: u32,
}
