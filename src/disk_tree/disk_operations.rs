//! Disk Tree Operations
//!
//! Faces are split recursively at the index midpoint after sorting by centroid
//! along the dominant axis of the centroid bounds. Every split halves the range,
//! so recursion depth never exceeds ceil(log2(face count)) + 1.

use super::disk_data::{Disk, DiskTree};
use crate::config::{AxisTieBreak, HierarchyConfig};
use crate::constants::NULL_INDEX;
use crate::geometry::{aabb_from_points3, dominant_axis, face_cross, triangle_centroid};
use crate::mesh::{triangle_count, triangle_positions, MeshData};
use crate::stats::HierarchyStats;
use glam::Vec3;

/// Check if a disk is a leaf
pub fn is_leaf(disk: &Disk) -> bool {
    disk.left_child_index == NULL_INDEX && disk.right_child_index == NULL_INDEX
}

struct DiskTreeBuilder<'a> {
    mesh: &'a MeshData,
    centroids: Vec<Vec3>,
    disks: Vec<Disk>,
    tie_break: AxisTieBreak,
    max_depth: u32,
    degenerate_faces: usize,
    degenerate_blends: usize,
}

impl<'a> DiskTreeBuilder<'a> {
    fn build_leaf(&mut self, parent_index: u32, face: u32) -> u32 {
        let [v0, v1, v2] = triangle_positions(self.mesh, face as usize);
        let cross = face_cross(v0, v1, v2);
        let length = cross.length();
        if length == 0.0 {
            self.degenerate_faces += 1;
        }

        self.disks[face as usize] = Disk {
            area: length * 0.5,
            parent_index,
            centroid: self.centroids[face as usize],
            normal: cross.normalize_or_zero(),
            ..Disk::EMPTY
        };
        face
    }

    fn build(&mut self, parent_index: u32, faces: &mut [u32], depth: u32) -> u32 {
        self.max_depth = self.max_depth.max(depth);

        match faces.len() {
            0 => return NULL_INDEX,
            1 => return self.build_leaf(parent_index, faces[0]),
            _ => {}
        }

        let bounds = aabb_from_points3(faces.iter().map(|&f| self.centroids[f as usize]));
        let axis = dominant_axis(&bounds, self.tie_break);
        let centroids = &self.centroids;
        faces.sort_by(|&a, &b| centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis]));

        let index = self.disks.len() as u32;
        self.disks.push(Disk {
            parent_index,
            ..Disk::EMPTY
        });

        let mid = faces.len() / 2;
        let (left_faces, right_faces) = faces.split_at_mut(mid);
        let left = self.build(index, left_faces, depth + 1);
        let right = self.build(index, right_faces, depth + 1);

        let disk = &mut self.disks[index as usize];
        disk.left_child_index = left;
        disk.right_child_index = right;
        if !set_parent_disk(&mut self.disks, index) {
            self.degenerate_blends += 1;
        }
        index
    }
}

/// Fill an interior disk from its two children
///
/// Area is the sum; centroid and normal are `mix(left, right, w)` with
/// `w = right.area / area`. When the blend produces NaN (zero total area) the
/// centroid falls back to the midpoint and the normal to the normalized
/// centroid. Returns false if the fallback was taken.
pub fn set_parent_disk(disks: &mut [Disk], index: u32) -> bool {
    let parent = disks[index as usize];
    let left = disks[parent.left_child_index as usize];
    let right = disks[parent.right_child_index as usize];

    let area = left.area + right.area;
    let weight = right.area / area;
    let mut centroid = left.centroid.lerp(right.centroid, weight);
    let mut normal = left.normal.lerp(right.normal, weight);
    let blended = !(centroid.is_nan() || normal.is_nan());
    if !blended {
        centroid = (left.centroid + right.centroid) * 0.5;
        normal = centroid.normalize_or_zero();
    }

    let disk = &mut disks[index as usize];
    disk.area = area;
    disk.centroid = centroid;
    disk.normal = normal;
    blended
}

/// Node visited after the subtree of `index` is exhausted
///
/// A left child continues at its right sibling; otherwise climb until an
/// ancestor is a left child and take its sibling. The root has no next.
pub fn next_index(disks: &[Disk], index: u32) -> u32 {
    let mut current = index;
    loop {
        let parent = disks[current as usize].parent_index;
        if parent == NULL_INDEX {
            return NULL_INDEX;
        }
        let p = &disks[parent as usize];
        if p.left_child_index == current && p.right_child_index != NULL_INDEX {
            return p.right_child_index;
        }
        current = parent;
    }
}

/// Set `next_index` on every disk
pub fn assign_next_indices(disks: &mut [Disk]) {
    for i in 0..disks.len() {
        let next = next_index(disks, i as u32);
        disks[i].next_index = next;
    }
}

/// Build the disk tree over all faces of `mesh`
pub fn build_disk_tree(mesh: &MeshData, config: &HierarchyConfig) -> DiskTree {
    let face_count = triangle_count(mesh);
    let centroids: Vec<Vec3> = (0..face_count)
        .map(|f| {
            let [v0, v1, v2] = triangle_positions(mesh, f);
            triangle_centroid(v0, v1, v2)
        })
        .collect();

    let mut disks = Vec::with_capacity((2 * face_count).saturating_sub(1));
    disks.resize(face_count, Disk::EMPTY);

    let mut builder = DiskTreeBuilder {
        mesh,
        centroids,
        disks,
        tie_break: config.axis_tie_break,
        max_depth: 0,
        degenerate_faces: 0,
        degenerate_blends: 0,
    };

    let mut faces: Vec<u32> = (0..face_count as u32).collect();
    let root_index = builder.build(NULL_INDEX, &mut faces, 0);
    let mut disks = builder.disks;
    assign_next_indices(&mut disks);

    if builder.degenerate_faces > 0 || builder.degenerate_blends > 0 {
        log::debug!(
            "[build_disk_tree] {} zero-area faces, {} interior disks used the midpoint fallback",
            builder.degenerate_faces,
            builder.degenerate_blends
        );
    }
    log::info!(
        "[build_disk_tree] Built {} disks over {} faces (depth {})",
        disks.len(),
        face_count,
        builder.max_depth
    );

    DiskTree {
        disks,
        root_index,
        face_count: face_count as u32,
        max_depth: builder.max_depth,
    }
}

/// Get disk tree statistics
pub fn disk_tree_stats(tree: &DiskTree) -> HierarchyStats {
    let leaf_count = tree.disks.iter().filter(|d| is_leaf(d)).count() as u32;
    HierarchyStats {
        node_count: tree.disks.len() as u32,
        leaf_count,
        max_depth: tree.max_depth,
        memory_usage_kb: (tree.disks.len() * std::mem::size_of::<crate::gpu::GpuDisk>()) as f32
            / 1024.0,
    }
}
