//! Mesh Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in mesh_operations.rs and obj_operations.rs

use glam::{Vec2, Vec3};

/// Triangulated mesh as parsed from an OBJ file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (`v`)
    pub positions: Vec<Vec3>,
    /// Texture coordinates (`vt`)
    pub texcoords: Vec<Vec2>,
    /// One unit normal per position
    pub normals: Vec<Vec3>,
    /// Three position indices per triangle
    pub position_indices: Vec<u32>,
    /// Three texture indices per triangle, `None` where the corner had none
    pub texcoord_indices: Vec<Option<u32>>,
    /// Normals came from `vn` records rather than reconstruction
    pub normals_from_file: bool,
}
