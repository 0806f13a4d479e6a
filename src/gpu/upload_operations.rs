//! GPU Upload Operations
//!
//! Packed records go to the device verbatim. A write is refused unless the
//! record array fills the destination buffer exactly.

use crate::error::{HierarchyResult, InvariantViolation};
use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Check that `records` exactly fill a buffer of `buffer_size` bytes
pub fn check_upload_size<T: Pod>(buffer_size: u64, records: &[T]) -> HierarchyResult<()> {
    let record_size = std::mem::size_of::<T>() as u64;
    let actual_bytes = record_size * records.len() as u64;
    if actual_bytes != buffer_size {
        return Err(InvariantViolation::BufferSizeMismatch {
            expected: (buffer_size / record_size.max(1)) as usize,
            actual: records.len(),
        }
        .into());
    }
    Ok(())
}

/// Create a storage buffer initialised with `records`
pub fn create_storage_buffer<T: Pod>(
    device: &wgpu::Device,
    label: &str,
    records: &[T],
) -> wgpu::Buffer {
    log::debug!(
        "[create_storage_buffer] {}: {} records, {} bytes",
        label,
        records.len(),
        records.len() * std::mem::size_of::<T>()
    );
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(records),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    })
}

/// Overwrite `buffer` with `records`
pub fn write_storage_buffer<T: Pod>(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    records: &[T],
) -> HierarchyResult<()> {
    if let Err(e) = check_upload_size(buffer.size(), records) {
        log::error!("[write_storage_buffer] Refusing upload: {}", e);
        return Err(e);
    }
    queue.write_buffer(buffer, 0, bytemuck::cast_slice(records));
    Ok(())
}
