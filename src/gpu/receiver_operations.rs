//! Receiver Buffer Operations - Pure DOP Functions
//!
//! Per-vertex buffers the occlusion passes shade, plus dispatch sizing.

use super::gpu_types::{MeshVertex, ReceiverVertex};
use crate::mesh::MeshData;
use crate::surface::SurfaceVertex;

/// Receivers for the dynamic pass, one per vertex, fully unoccluded
pub fn receiver_vertices(vertices: &[SurfaceVertex]) -> Vec<ReceiverVertex> {
    vertices
        .iter()
        .map(|v| ReceiverVertex {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            bent_normal: v.normal.to_array(),
            accessibility: 1.0,
        })
        .collect()
}

/// Interleaved position and normal per mesh position
pub fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .zip(mesh.normals.iter())
        .map(|(position, normal)| MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        })
        .collect()
}

/// Triangle position indices, three per face
pub fn index_buffer(mesh: &MeshData) -> Vec<u32> {
    mesh.position_indices.clone()
}

/// Work groups needed to cover `size` invocations
pub fn dispatch_group_count(size: u32, group_size: u32) -> u32 {
    let group_size = group_size.max(1);
    size / group_size + u32::from(size % group_size != 0)
}
