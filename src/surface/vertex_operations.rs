//! Surface Vertex Operations - Pure DOP Functions

use super::vertex_data::SurfaceVertex;
use crate::constants::UNMAPPED_CHART;
use crate::geometry::{face_cross, triangle_area};
use crate::mesh::MeshData;
use glam::{Vec2, Vec3};

/// Build the vertex list with per-vertex area and normal
///
/// Every triangle adds a third of its area and its unnormalized face normal to
/// each corner; normals are normalized once all triangles are in. Charts are
/// left unassigned.
pub fn aggregate_vertices(mesh: &MeshData) -> Vec<SurfaceVertex> {
    let mut vertices: Vec<SurfaceVertex> = mesh
        .positions
        .iter()
        .map(|&position| SurfaceVertex {
            position,
            normal: Vec3::ZERO,
            separator: Vec2::ZERO,
            area: 0.0,
            chart_id: UNMAPPED_CHART,
        })
        .collect();

    let mut degenerate_triangles = 0usize;
    for tri in mesh.position_indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (v0, v1, v2) = (vertices[i0].position, vertices[i1].position, vertices[i2].position);
        let third = triangle_area(v0, v1, v2) / 3.0;
        let normal = face_cross(v0, v1, v2);
        if third == 0.0 {
            degenerate_triangles += 1;
        }
        for i in [i0, i1, i2] {
            vertices[i].area += third;
            vertices[i].normal += normal;
        }
    }

    for v in vertices.iter_mut() {
        v.normal = v.normal.normalize_or_zero();
    }

    if degenerate_triangles > 0 {
        log::debug!(
            "[aggregate_vertices] {} zero-area triangles contributed nothing",
            degenerate_triangles
        );
    }
    log::debug!(
        "[aggregate_vertices] Aggregated {} vertices from {} triangles",
        vertices.len(),
        mesh.position_indices.len() / 3
    );
    vertices
}

/// Sum of all vertex areas; equals the mesh surface area
pub fn total_vertex_area(vertices: &[SurfaceVertex]) -> f32 {
    vertices.iter().map(|v| v.area).sum()
}
