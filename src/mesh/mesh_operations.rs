//! Mesh Operations - Pure DOP Functions

use super::mesh_data::MeshData;
use crate::geometry::face_cross;
use glam::Vec3;

/// Number of triangles in the mesh
pub fn triangle_count(mesh: &MeshData) -> usize {
    mesh.position_indices.len() / 3
}

/// Corner positions of triangle `t`
pub fn triangle_positions(mesh: &MeshData, t: usize) -> [Vec3; 3] {
    let base = t * 3;
    [
        mesh.positions[mesh.position_indices[base] as usize],
        mesh.positions[mesh.position_indices[base + 1] as usize],
        mesh.positions[mesh.position_indices[base + 2] as usize],
    ]
}

/// Texture indices of triangle `t`, or `None` if any corner lacks one
pub fn triangle_texcoord_indices(mesh: &MeshData, t: usize) -> Option<[u32; 3]> {
    let base = t * 3;
    Some([
        mesh.texcoord_indices[base]?,
        mesh.texcoord_indices[base + 1]?,
        mesh.texcoord_indices[base + 2]?,
    ])
}

/// Reconstruct per-vertex normals from geometry
///
/// Each triangle adds its unnormalized face cross product to its three
/// corners; every sum is normalized once at the end, so visitation order only
/// affects rounding. Vertices touched by no non-degenerate triangle get a zero
/// normal.
pub fn compute_vertex_normals(positions: &[Vec3], position_indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in position_indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let n = face_cross(positions[i0], positions[i1], positions[i2]);
        normals[i0] += n;
        normals[i1] += n;
        normals[i2] += n;
    }

    let mut degenerate = 0usize;
    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
        if *n == Vec3::ZERO {
            degenerate += 1;
        }
    }
    if degenerate > 0 {
        log::debug!(
            "[compute_vertex_normals] {} of {} vertices have no usable normal",
            degenerate,
            positions.len()
        );
    }
    normals
}
