//! GPU-facing output
//!
//! Record layouts shared with the occlusion shaders, the packers that flatten
//! both trees into them, and the wgpu upload helpers.

pub mod gpu_types;
pub mod packing_operations;
pub mod receiver_operations;
pub mod upload_operations;

pub use gpu_types::{GpuDisk, GpuDiskLayout, GpuElement, GpuElementLayout, MeshVertex, ReceiverVertex};
pub use packing_operations::{
    disk_traversal_order, pack_disk_tree, pack_element_forest, traverse_packed_disks,
    traverse_packed_elements, PackedDiskTree,
};
pub use receiver_operations::{dispatch_group_count, index_buffer, mesh_vertices, receiver_vertices};
pub use upload_operations::{check_upload_size, create_storage_buffer, write_storage_buffer};
