//! Geometry helpers shared by the mesh loader and both hierarchy builders

pub mod aabb;
pub mod triangle;

pub use aabb::{
    aabb2_extent, aabb3_extent, aabb_from_points2, aabb_from_points3, dominant_axis, AABB2, AABB3,
};
pub use triangle::{face_cross, triangle_area, triangle_centroid};
