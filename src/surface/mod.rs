//! Per-vertex surface data for the element hierarchy
//!
//! Vertices carry one third of the area of every adjacent triangle and a smooth
//! normal, and are grouped into charts by flood-filling texture islands.

pub mod chart_operations;
pub mod vertex_data;
pub mod vertex_operations;

pub use chart_operations::{assign_charts, chart_members};
pub use vertex_data::{ChartAssignment, SurfaceVertex};
pub use vertex_operations::{aggregate_vertices, total_vertex_area};
