//! Per-triangle quantities

use glam::Vec3;

/// Unnormalized face normal: (v1 - v0) x (v2 - v0)
/// Its length is twice the triangle area.
pub fn face_cross(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0)
}

/// Triangle area as half the cross-product magnitude
pub fn triangle_area(v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    face_cross(v0, v1, v2).length() * 0.5
}

/// Vertex average
pub fn triangle_centroid(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v0 + v1 + v2) / 3.0
}
