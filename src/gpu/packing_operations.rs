//! GPU Buffer Packing - Pure DOP Functions
//!
//! Flattens the finished trees into dense record arrays. Every link is
//! remapped from arena index to record index; links that have no record
//! become the null sentinel of the record type.

use super::gpu_types::{GpuDisk, GpuElement};
use crate::config::PackOrder;
use crate::constants::{NULL_INDEX, NULL_INDEX_SIGNED};
use crate::disk_tree::{Disk, DiskTree};
use crate::element_tree::{traversal_order, ElementForest};
use crate::error::{HierarchyResult, InvariantViolation};
use bytemuck::Zeroable;
use std::f32::consts::PI;

/// Packed disk records plus the record index of the root
#[derive(Debug, Clone, PartialEq)]
pub struct PackedDiskTree {
    pub records: Vec<GpuDisk>,
    /// `NULL_INDEX` for an empty tree
    pub root_index: u32,
}

fn signed_link(remap: &[u32], link: u32) -> i32 {
    if link == NULL_INDEX {
        return NULL_INDEX_SIGNED;
    }
    match remap[link as usize] {
        NULL_INDEX => NULL_INDEX_SIGNED,
        slot => slot as i32,
    }
}

fn unsigned_link(remap: &[u32], link: u32) -> u32 {
    if link == NULL_INDEX {
        NULL_INDEX
    } else {
        remap[link as usize]
    }
}

/// Pack the reachable element nodes into GPU records
///
/// The record count must equal the element count recorded by the bottom-up
/// update, otherwise the upload would not match the buffer the build sized.
pub fn pack_element_forest(
    forest: &ElementForest,
    order: PackOrder,
) -> HierarchyResult<Vec<GpuElement>> {
    let walk = traversal_order(&forest.nodes, forest.head)?;
    let expected = forest.summary.total_elements as usize;
    if walk.len() != expected {
        return Err(InvariantViolation::BufferSizeMismatch {
            expected,
            actual: walk.len(),
        }
        .into());
    }

    let mut remap = vec![NULL_INDEX; forest.nodes.len()];
    for (position, &node) in walk.iter().enumerate() {
        remap[node as usize] = match order {
            PackOrder::Traversal => position as u32,
            PackOrder::Build => forest.nodes[node as usize]
                .index
                .ok_or(InvariantViolation::UnfinalizedElement { node })?,
        };
    }

    let mut records = vec![GpuElement::default(); walk.len()];
    for &node in &walk {
        let slot = remap[node as usize] as usize;
        if slot >= records.len() {
            return Err(InvariantViolation::BufferSizeMismatch {
                expected,
                actual: slot + 1,
            }
            .into());
        }
        let element = &forest.nodes[node as usize];
        records[slot] = GpuElement {
            next_index: signed_link(&remap, element.next),
            child_index: signed_link(&remap, element.child),
            area_over_pi: element.area / PI,
            position: element.position.to_array(),
            normal: element.normal.to_array(),
            ..GpuElement::default()
        };
    }

    log::info!(
        "[pack_element_forest] Packed {} element records ({:?} order, {} bytes)",
        records.len(),
        order,
        records.len() * std::mem::size_of::<GpuElement>()
    );
    Ok(records)
}

/// Disks reachable from `root`, visiting the left child first and `next` otherwise
pub fn disk_traversal_order(disks: &[Disk], root: u32) -> HierarchyResult<Vec<u32>> {
    let mut order = Vec::new();
    let mut ptr = root;
    while ptr != NULL_INDEX {
        if order.len() >= disks.len() {
            return Err(InvariantViolation::TraversalCycle { steps: order.len() }.into());
        }
        order.push(ptr);
        let disk = &disks[ptr as usize];
        ptr = if disk.left_child_index != NULL_INDEX {
            disk.left_child_index
        } else {
            disk.next_index
        };
    }
    Ok(order)
}

/// Pack a disk tree into GPU records
pub fn pack_disk_tree(tree: &DiskTree, order: PackOrder) -> HierarchyResult<PackedDiskTree> {
    let walk = disk_traversal_order(&tree.disks, tree.root_index)?;
    if walk.len() != tree.disks.len() {
        return Err(InvariantViolation::BufferSizeMismatch {
            expected: tree.disks.len(),
            actual: walk.len(),
        }
        .into());
    }

    let remap: Vec<u32> = match order {
        PackOrder::Traversal => {
            let mut remap = vec![NULL_INDEX; tree.disks.len()];
            for (position, &disk) in walk.iter().enumerate() {
                remap[disk as usize] = position as u32;
            }
            remap
        }
        PackOrder::Build => (0..tree.disks.len() as u32).collect(),
    };

    let mut records = vec![GpuDisk::zeroed(); tree.disks.len()];
    for (i, disk) in tree.disks.iter().enumerate() {
        records[remap[i] as usize] = GpuDisk {
            area_over_pi: disk.area / PI,
            parent_index: unsigned_link(&remap, disk.parent_index),
            next_index: unsigned_link(&remap, disk.next_index),
            left_child_index: unsigned_link(&remap, disk.left_child_index),
            right_child_index: unsigned_link(&remap, disk.right_child_index),
            _padding0: [0; 3],
            centroid: disk.centroid.to_array(),
            _padding1: 0.0,
            normal: disk.normal.to_array(),
            _padding2: 0.0,
        };
    }

    let root_index = unsigned_link(&remap, tree.root_index);
    log::info!(
        "[pack_disk_tree] Packed {} disk records ({:?} order, root {})",
        records.len(),
        order,
        root_index
    );
    Ok(PackedDiskTree {
        records,
        root_index,
    })
}

/// Walk packed element records the way the shader does
///
/// Returns the visited record indices. Fails on a link outside the buffer or
/// when the walk does not end within one step per record.
pub fn traverse_packed_elements(records: &[GpuElement], start: i32) -> HierarchyResult<Vec<u32>> {
    let mut visited = Vec::new();
    let mut ptr = start;
    while ptr != NULL_INDEX_SIGNED {
        let slot = ptr as usize;
        if ptr < 0 || slot >= records.len() {
            return Err(InvariantViolation::BufferSizeMismatch {
                expected: records.len(),
                actual: slot.saturating_add(1),
            }
            .into());
        }
        if visited.len() >= records.len() {
            return Err(InvariantViolation::TraversalCycle {
                steps: visited.len(),
            }
            .into());
        }
        visited.push(slot as u32);
        let record = &records[slot];
        ptr = if record.child_index != NULL_INDEX_SIGNED {
            record.child_index
        } else {
            record.next_index
        };
    }
    Ok(visited)
}

/// Walk packed disk records the way the shader does
pub fn traverse_packed_disks(records: &[GpuDisk], root: u32) -> HierarchyResult<Vec<u32>> {
    let mut visited = Vec::new();
    let mut ptr = root;
    while ptr != NULL_INDEX {
        if ptr as usize >= records.len() {
            return Err(InvariantViolation::BufferSizeMismatch {
                expected: records.len(),
                actual: ptr as usize + 1,
            }
            .into());
        }
        if visited.len() >= records.len() {
            return Err(InvariantViolation::TraversalCycle {
                steps: visited.len(),
            }
            .into());
        }
        visited.push(ptr);
        let record = &records[ptr as usize];
        ptr = if record.left_child_index != NULL_INDEX {
            record.left_child_index
        } else {
            record.next_index
        };
    }
    Ok(visited)
}
