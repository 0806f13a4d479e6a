//! Wavefront OBJ reader
//!
//! Handles `v`, `vt`, `vn` and `f`; every other directive is skipped, as is
//! anything after a `#`. Polygon faces are fan-triangulated. Unlike a lenient
//! reader, a token that should be a finite number and is not aborts the load
//! with a `ParseError`.
//!
//! Negative (relative) indices resolve against the elements read so far.
//! Positive indices are checked against the complete file, so a face may
//! reference vertices declared after it.

use std::path::Path;

use glam::{Vec2, Vec3};

use super::mesh_data::MeshData;
use super::mesh_operations::compute_vertex_normals;
use crate::error::{ErrorContext, HierarchyError, HierarchyResult, OptionExt};

/// One `pos/tex/norm` face corner, indices already made zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    position: u32,
    texcoord: Option<u32>,
    normal: Option<u32>,
}

fn parse_float(token: Option<&str>, line: usize) -> HierarchyResult<f32> {
    let token = token.ok_or_hierarchy(|| HierarchyError::ParseError {
        line,
        token: String::new(),
        expected: "f32".to_string(),
    })?;
    let value = token.parse::<f32>().map_err(|_| HierarchyError::ParseError {
        line,
        token: token.to_string(),
        expected: "f32".to_string(),
    })?;
    if !value.is_finite() {
        return Err(HierarchyError::ParseError {
            line,
            token: token.to_string(),
            expected: "finite f32".to_string(),
        });
    }
    Ok(value)
}

/// Make a one-based or negative (relative) OBJ index zero-based
///
/// Relative indices resolve against `len`, the count read so far. The upper
/// bound of positive indices is checked once the whole file is read.
fn resolve_index(field: &str, len: usize, line: usize) -> HierarchyResult<u32> {
    let raw = field.parse::<i64>().map_err(|_| HierarchyError::ParseError {
        line,
        token: field.to_string(),
        expected: "index".to_string(),
    })?;
    let resolved = match raw {
        0 => {
            return Err(HierarchyError::MalformedFace {
                line,
                reason: "index 0 is not a valid OBJ index".to_string(),
            })
        }
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    u32::try_from(resolved).map_err(|_| HierarchyError::MalformedFace {
        line,
        reason: format!("index {} out of range (have {})", raw, len),
    })
}

fn parse_corner(
    token: &str,
    counts: (usize, usize, usize),
    line: usize,
) -> HierarchyResult<Corner> {
    let mut fields = token.split('/');
    let position = match fields.next() {
        Some(f) if !f.is_empty() => resolve_index(f, counts.0, line)?,
        _ => {
            return Err(HierarchyError::MalformedFace {
                line,
                reason: format!("corner '{}' has no position index", token),
            })
        }
    };
    let texcoord = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, counts.1, line)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, counts.2, line)?),
        _ => None,
    };
    Ok(Corner {
        position,
        texcoord,
        normal,
    })
}

fn check_range(index: u32, len: usize, what: &str, line: usize) -> HierarchyResult<()> {
    if index as usize >= len {
        return Err(HierarchyError::MalformedFace {
            line,
            reason: format!("{} index {} out of range (have {})", what, index + 1, len),
        });
    }
    Ok(())
}

/// Parse OBJ text into a triangulated mesh
pub fn parse_obj_str(text: &str) -> HierarchyResult<MeshData> {
    let mut mesh = MeshData::default();
    let mut file_normals: Vec<Vec3> = Vec::new();
    let mut normal_indices: Vec<Option<u32>> = Vec::new();
    let mut corner_lines: Vec<usize> = Vec::new();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let s = raw_line.split('#').next().unwrap_or("").trim();
        if s.is_empty() {
            continue;
        }
        let mut it = s.split_whitespace();
        let tag = it.next().unwrap_or("");
        match tag {
            "v" => {
                let x = parse_float(it.next(), line_no)?;
                let y = parse_float(it.next(), line_no)?;
                let z = parse_float(it.next(), line_no)?;
                mesh.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let u = parse_float(it.next(), line_no)?;
                let v = parse_float(it.next(), line_no)?;
                mesh.texcoords.push(Vec2::new(u, v));
            }
            "vn" => {
                let x = parse_float(it.next(), line_no)?;
                let y = parse_float(it.next(), line_no)?;
                let z = parse_float(it.next(), line_no)?;
                file_normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let counts = (mesh.positions.len(), mesh.texcoords.len(), file_normals.len());
                let corners = it
                    .map(|token| parse_corner(token, counts, line_no))
                    .collect::<HierarchyResult<Vec<Corner>>>()?;
                if corners.len() < 3 {
                    return Err(HierarchyError::MalformedFace {
                        line: line_no,
                        reason: format!("face has {} corners, need at least 3", corners.len()),
                    });
                }
                // Fan triangulation around the first corner
                for k in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[k], corners[k + 1]] {
                        mesh.position_indices.push(corner.position);
                        mesh.texcoord_indices.push(corner.texcoord);
                        normal_indices.push(corner.normal);
                        corner_lines.push(line_no);
                    }
                }
            }
            _ => {}
        }
    }

    for (i, &line) in corner_lines.iter().enumerate() {
        check_range(mesh.position_indices[i], mesh.positions.len(), "position", line)?;
        if let Some(t) = mesh.texcoord_indices[i] {
            check_range(t, mesh.texcoords.len(), "texcoord", line)?;
        }
        if let Some(n) = normal_indices[i] {
            check_range(n, file_normals.len(), "normal", line)?;
        }
    }

    let every_corner_has_normal =
        !normal_indices.is_empty() && normal_indices.iter().all(Option::is_some);
    mesh.normals = if every_corner_has_normal {
        let mut normals = vec![Vec3::ZERO; mesh.positions.len()];
        for (position, normal) in mesh.position_indices.iter().zip(normal_indices.iter().flatten()) {
            normals[*position as usize] += file_normals[*normal as usize];
        }
        mesh.normals_from_file = true;
        normals.into_iter().map(Vec3::normalize_or_zero).collect()
    } else {
        compute_vertex_normals(&mesh.positions, &mesh.position_indices)
    };

    Ok(mesh)
}

/// Load and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> HierarchyResult<MeshData> {
    let path_str = path.as_ref().display().to_string();
    let text = match std::fs::read_to_string(path.as_ref()).with_path(&path_str) {
        Ok(text) => text,
        Err(e) => {
            log::error!("[load_obj] Could not read mesh: {}", e);
            return Err(e);
        }
    };

    let mesh = parse_obj_str(&text).map_err(|e| {
        log::error!("[load_obj] Failed to parse {}: {}", path_str, e);
        e
    })?;

    log::info!(
        "[load_obj] Loaded {}: {} positions, {} texcoords, {} triangles (normals {})",
        path_str,
        mesh.positions.len(),
        mesh.texcoords.len(),
        mesh.position_indices.len() / 3,
        if mesh.normals_from_file { "from file" } else { "reconstructed" }
    );
    Ok(mesh)
}
