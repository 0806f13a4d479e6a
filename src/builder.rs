//! Top-level hierarchy builds
//!
//! One call per occlusion variant: load the mesh, build the tree, pack the GPU
//! records. Dispatch sizes follow `thread_group_size`. A build either completes or returns an error; nothing partially
//! built is handed out.

use crate::config::HierarchyConfig;
use crate::disk_tree::{build_disk_tree, disk_tree_stats, DiskTree};
use crate::element_tree::{build_element_forest, element_forest_stats, ElementForest};
use crate::error::{HierarchyError, HierarchyResult};
use crate::gpu::{
    dispatch_group_count, index_buffer, mesh_vertices, pack_disk_tree, pack_element_forest,
    receiver_vertices, GpuDisk, GpuElement, MeshVertex, ReceiverVertex,
};
use crate::mesh::{load_obj, MeshData};
use crate::stats::HierarchyStats;
use crate::surface::{aggregate_vertices, assign_charts, SurfaceVertex};
use std::path::Path;

/// Output of the dynamic (surface element) build
#[derive(Debug, Clone)]
pub struct SurfaceElements {
    pub vertices: Vec<SurfaceVertex>,
    pub chart_count: u32,
    pub forest: ElementForest,
    pub records: Vec<GpuElement>,
    pub receivers: Vec<ReceiverVertex>,
    pub indices: Vec<u32>,
    pub stats: HierarchyStats,
    /// Work groups covering one invocation per element record
    pub element_groups: u32,
    /// Work groups covering one invocation per receiver vertex
    pub receiver_groups: u32,
}

/// Output of the high-quality (disk tree) build
#[derive(Debug, Clone)]
pub struct OcclusionTree {
    pub tree: DiskTree,
    pub records: Vec<GpuDisk>,
    /// Record index the shader starts from
    pub root_index: u32,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub stats: HierarchyStats,
    /// Work groups covering one invocation per disk record
    pub disk_groups: u32,
    /// Work groups covering one invocation per mesh vertex
    pub vertex_groups: u32,
}

fn validated(config: &HierarchyConfig) -> HierarchyResult<()> {
    config.validate().map_err(|e| HierarchyError::InvalidConfig {
        field: "HierarchyConfig".to_string(),
        value: format!("{:?}", config),
        reason: e.to_string(),
    })
}

fn logged<T>(function: &str, result: HierarchyResult<T>) -> HierarchyResult<T> {
    if let Err(e) = &result {
        log::error!("[{}] Build aborted: {}", function, e);
    }
    result
}

fn surface_elements(mesh: &MeshData, config: &HierarchyConfig) -> HierarchyResult<SurfaceElements> {
    validated(config)?;

    let mut vertices = aggregate_vertices(mesh);
    let charts = assign_charts(mesh, &mut vertices);
    let forest = build_element_forest(&vertices, &charts, config)?;
    let records = pack_element_forest(&forest, config.pack_order)?;
    let stats = element_forest_stats(&forest);
    let receivers = receiver_vertices(&vertices);

    Ok(SurfaceElements {
        element_groups: dispatch_group_count(records.len() as u32, config.thread_group_size),
        receiver_groups: dispatch_group_count(receivers.len() as u32, config.thread_group_size),
        receivers,
        indices: index_buffer(mesh),
        chart_count: charts.chart_count,
        vertices,
        forest,
        records,
        stats,
    })
}

fn occlusion_tree(mesh: &MeshData, config: &HierarchyConfig) -> HierarchyResult<OcclusionTree> {
    validated(config)?;

    let tree = build_disk_tree(mesh, config);
    let packed = pack_disk_tree(&tree, config.pack_order)?;
    let stats = disk_tree_stats(&tree);
    let vertices = mesh_vertices(mesh);

    Ok(OcclusionTree {
        disk_groups: dispatch_group_count(packed.records.len() as u32, config.thread_group_size),
        vertex_groups: dispatch_group_count(vertices.len() as u32, config.thread_group_size),
        records: packed.records,
        root_index: packed.root_index,
        vertices,
        indices: index_buffer(mesh),
        tree,
        stats,
    })
}

/// Build the surface element hierarchy of an already loaded mesh
pub fn build_surface_elements_from_mesh(
    mesh: &MeshData,
    config: &HierarchyConfig,
) -> HierarchyResult<SurfaceElements> {
    logged("build_surface_elements", surface_elements(mesh, config))
}

/// Load an OBJ file and build its surface element hierarchy
pub fn build_surface_elements<P: AsRef<Path>>(
    path: P,
    config: &HierarchyConfig,
) -> HierarchyResult<SurfaceElements> {
    let mesh = load_obj(path)?;
    build_surface_elements_from_mesh(&mesh, config)
}

/// Build the disk tree of an already loaded mesh
pub fn build_occlusion_tree_from_mesh(
    mesh: &MeshData,
    config: &HierarchyConfig,
) -> HierarchyResult<OcclusionTree> {
    logged("build_occlusion_tree", occlusion_tree(mesh, config))
}

/// Load an OBJ file and build its disk tree
pub fn build_occlusion_tree<P: AsRef<Path>>(
    path: P,
    config: &HierarchyConfig,
) -> HierarchyResult<OcclusionTree> {
    let mesh = load_obj(path)?;
    build_occlusion_tree_from_mesh(&mesh, config)
}
