// Occlusion Hierarchy - Data-Oriented Programming (DOP) Architecture
//
// Builds the surface hierarchies consumed by GPU ambient-occlusion passes:
// - disk_tree: balanced binary tree over mesh faces (high-quality variant)
// - element_tree: per-chart k-d forest over vertices (dynamic variant)
// - gpu: packed storage-buffer records and upload helpers
//
// Data lives in *_data modules, transformations in *_operations modules.

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod error;
pub mod stats;

// Input
pub mod geometry;
pub mod mesh;
pub mod surface;

// Hierarchies
pub mod disk_tree;
pub mod element_tree;

// GPU output
pub mod gpu;

// Entry points
pub mod builder;

pub use builder::{
    build_occlusion_tree, build_occlusion_tree_from_mesh, build_surface_elements,
    build_surface_elements_from_mesh, OcclusionTree, SurfaceElements,
};
pub use config::{AxisTieBreak, HierarchyConfig, PackOrder};
pub use error::{HierarchyError, HierarchyResult, InvariantViolation};
pub use stats::HierarchyStats;
