//! Surface Vertex Data - Pure DOP
//!
//! NO METHODS. Just data.

use glam::{Vec2, Vec3};

/// One mesh vertex with its aggregated area of influence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Texture coordinate used to split charts
    pub separator: Vec2,
    /// One third of the area of every adjacent triangle
    pub area: f32,
    /// 0 = unmapped
    pub chart_id: u32,
}

/// Result of the texture-island flood fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartAssignment {
    /// Number of chart ids handed out (ids run 1..=chart_count)
    pub chart_count: u32,
    /// Chart id per texture coordinate
    pub texcoord_charts: Vec<u32>,
}
