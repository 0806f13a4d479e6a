//! Disk tree for the high-quality occlusion pass
//!
//! A balanced binary tree over mesh faces. Leaves are one disk per face and sit
//! at slot == face index; interior disks are appended after them and carry the
//! area-weighted blend of their two children.

pub mod disk_data;
pub mod disk_operations;

pub use disk_data::{Disk, DiskTree};
pub use disk_operations::{
    assign_next_indices, build_disk_tree, disk_tree_stats, is_leaf, next_index, set_parent_disk,
};
