//! Surface element hierarchy for the dynamic occlusion pass
//!
//! Per chart, vertices are split into a binary k-d tree on their texture
//! coordinates, relocated into a child/next tree of bounded fan-out, then the
//! whole forest is linked for pointer-free traversal and aggregated bottom-up.
//! All nodes live in one arena; links are arena indices.

pub mod element_data;
pub mod element_operations;
pub mod forest_operations;
pub mod linearize_operations;

pub use element_data::{ElementForest, ElementNode, ElementSummary, MedianSplit};
pub use element_operations::{
    create_element_tree, element_bounds, find_median, is_leaf, push_element_list,
};
pub use forest_operations::{build_element_forest, element_forest_stats, traversal_order};
pub use linearize_operations::{link_tree, relocate_element_tree, update_all_elements};
