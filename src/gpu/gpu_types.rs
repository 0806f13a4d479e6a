//! GPU record layouts
//!
//! Storage-buffer records read by the occlusion shaders. Layouts follow std430
//! with explicit padding so the structs are `Pod` and upload byte for byte.
//! Null links are -1 in element records and `0xFFFFFFFF` in disk records.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Packed surface element (dynamic occlusion variant)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuElement {
    /// Record to visit after this subtree, -1 at the end of the walk
    pub next_index: i32,
    /// First child, -1 for leaves
    pub child_index: i32,
    pub area_over_pi: f32,
    pub _padding0: f32,
    pub position: [f32; 3],
    pub _padding1: f32,
    pub normal: [f32; 3],
    pub _padding2: f32,
}

/// Packed disk (high-quality occlusion variant)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuDisk {
    pub area_over_pi: f32,
    pub parent_index: u32,
    pub next_index: u32,
    pub left_child_index: u32,
    pub right_child_index: u32,
    pub _padding0: [u32; 3],
    pub centroid: [f32; 3],
    pub _padding1: f32,
    pub normal: [f32; 3],
    pub _padding2: f32,
}

/// Per-vertex receiver read and written by the dynamic occlusion passes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ReceiverVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Starts equal to `normal`
    pub bent_normal: [f32; 3],
    /// Starts fully unoccluded (1.0)
    pub accessibility: f32,
}

/// Interleaved position + normal for the high-quality pass
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<GpuElement>(), 48);
const_assert_eq!(std::mem::size_of::<GpuDisk>(), 64);
const_assert_eq!(std::mem::size_of::<ReceiverVertex>(), 40);
const_assert_eq!(std::mem::size_of::<MeshVertex>(), 24);

/// Shader-side view of `GpuElement`, used to check the host layout
#[derive(encase::ShaderType)]
pub struct GpuElementLayout {
    pub next_index: i32,
    pub child_index: i32,
    pub area_over_pi: f32,
    pub padding0: f32,
    pub position: glam::Vec3,
    pub padding1: f32,
    pub normal: glam::Vec3,
    pub padding2: f32,
}

/// Shader-side view of `GpuDisk`, used to check the host layout
#[derive(encase::ShaderType)]
pub struct GpuDiskLayout {
    pub area_over_pi: f32,
    pub parent_index: u32,
    pub next_index: u32,
    pub left_child_index: u32,
    pub right_child_index: u32,
    pub padding0: u32,
    pub padding1: u32,
    pub padding2: u32,
    pub centroid: glam::Vec3,
    pub padding3: f32,
    pub normal: glam::Vec3,
    pub padding4: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use encase::ShaderType;
    use std::mem::offset_of;

    #[test]
    fn test_host_layout_matches_shader_layout() {
        assert_eq!(
            GpuElementLayout::min_size().get(),
            std::mem::size_of::<GpuElement>() as u64
        );
        assert_eq!(
            GpuDiskLayout::min_size().get(),
            std::mem::size_of::<GpuDisk>() as u64
        );
    }

    #[test]
    fn test_vec3_fields_are_16_byte_aligned() {
        assert_eq!(offset_of!(GpuElement, position), 16);
        assert_eq!(offset_of!(GpuElement, normal), 32);
        assert_eq!(offset_of!(GpuDisk, centroid), 32);
        assert_eq!(offset_of!(GpuDisk, normal), 48);
    }
}
