//! Mesh loading
//!
//! Parses face-indexed OBJ text into flat position/texture/normal tables.
//! Following DOP principles - `MeshData` is plain data, the loaders and
//! normal reconstruction are free functions.

pub mod mesh_data;
pub mod mesh_operations;
pub mod obj_operations;

pub use mesh_data::MeshData;
pub use mesh_operations::{
    compute_vertex_normals, triangle_count, triangle_positions, triangle_texcoord_indices,
};
pub use obj_operations::{load_obj, parse_obj_str};
