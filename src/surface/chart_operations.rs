//! Chart partitioning by texture-coordinate flood fill
//!
//! Each unvisited texture index seeds a new chart. Triangles touching the
//! current chart pull all their corners into it, and the scan repeats until a
//! full pass changes nothing. Cost is O(chart size x triangle count) per chart.
//! Triangles with a corner lacking a texture index never take part, so their
//! vertices stay unmapped unless another triangle claims them.

use super::vertex_data::{ChartAssignment, SurfaceVertex};
use crate::constants::UNMAPPED_CHART;
use crate::mesh::{triangle_count, triangle_texcoord_indices, MeshData};

/// Assign chart ids and separators to `vertices`
///
/// On a seam the later chart takes over a vertex only through a corner whose
/// texture index is still unvisited.
pub fn assign_charts(mesh: &MeshData, vertices: &mut [SurfaceVertex]) -> ChartAssignment {
    let triangles: Vec<([u32; 3], [u32; 3])> = (0..triangle_count(mesh))
        .filter_map(|t| {
            let tex = triangle_texcoord_indices(mesh, t)?;
            let base = t * 3;
            let pos = [
                mesh.position_indices[base],
                mesh.position_indices[base + 1],
                mesh.position_indices[base + 2],
            ];
            Some((pos, tex))
        })
        .collect();

    let mut visit = vec![UNMAPPED_CHART; mesh.texcoords.len()];
    let mut id = UNMAPPED_CHART;

    for seed in 0..mesh.texcoords.len() {
        if visit[seed] != UNMAPPED_CHART {
            continue;
        }

        id += 1;
        visit[seed] = id;
        let mut passes = 0usize;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for (pos, tex) in &triangles {
                if tex.iter().all(|&t| visit[t as usize] != id) {
                    continue;
                }
                for k in 0..3 {
                    let t = tex[k] as usize;
                    let v = pos[k] as usize;
                    if visit[t] == UNMAPPED_CHART || vertices[v].chart_id == UNMAPPED_CHART {
                        visit[t] = id;
                        vertices[v].chart_id = id;
                        vertices[v].separator = mesh.texcoords[t];
                        changed = true;
                    }
                }
            }
        }
        log::trace!("[assign_charts] Chart {} settled after {} passes", id, passes);
    }

    let unmapped = vertices
        .iter()
        .filter(|v| v.chart_id == UNMAPPED_CHART)
        .count();
    log::debug!(
        "[assign_charts] {} charts over {} texcoords, {} vertices unmapped",
        id,
        mesh.texcoords.len(),
        unmapped
    );

    ChartAssignment {
        chart_count: id,
        texcoord_charts: visit,
    }
}

/// Indices of the vertices belonging to `chart_id`, in vertex order
pub fn chart_members(vertices: &[SurfaceVertex], chart_id: u32) -> Vec<u32> {
    vertices
        .iter()
        .enumerate()
        .filter(|(_, v)| v.chart_id == chart_id)
        .map(|(i, _)| i as u32)
        .collect()
}
