/// Data-Oriented Axis-Aligned Bounding Boxes
///
/// Pure functions over point sets - no methods, just data transformations.
/// The 3D box bounds triangle centroids for the disk tree split, the 2D box
/// bounds chart texture coordinates for the element split.

use crate::config::AxisTieBreak;
use glam::{Vec2, Vec3};

/// Axis-aligned box over 3D points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB3 {
    pub min: Vec3,
    pub max: Vec3,
}

/// Axis-aligned box over 2D points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB2 {
    pub min: Vec2,
    pub max: Vec2,
}

/// Bound a set of 3D points
/// Empty input yields an inverted box (min = MAX, max = MIN)
pub fn aabb_from_points3<I>(points: I) -> AABB3
where
    I: IntoIterator<Item = Vec3>,
{
    points.into_iter().fold(
        AABB3 {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        },
        |aabb, p| AABB3 {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        },
    )
}

/// Bound a set of 2D points
/// Empty input yields an inverted box (min = MAX, max = MIN)
pub fn aabb_from_points2<I>(points: I) -> AABB2
where
    I: IntoIterator<Item = Vec2>,
{
    points.into_iter().fold(
        AABB2 {
            min: Vec2::splat(f32::MAX),
            max: Vec2::splat(f32::MIN),
        },
        |aabb, p| AABB2 {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        },
    )
}

/// Extent of a 3D box along each axis
pub fn aabb3_extent(aabb: &AABB3) -> Vec3 {
    aabb.max - aabb.min
}

/// Extent of a 2D box along each axis
pub fn aabb2_extent(aabb: &AABB2) -> Vec2 {
    aabb.max - aabb.min
}

/// Axis of greatest extent, evaluated in x, y, z order
pub fn dominant_axis(aabb: &AABB3, tie_break: AxisTieBreak) -> usize {
    let extent = aabb3_extent(aabb);
    let mut axis = 0;
    for candidate in 1..3 {
        let replace = match tie_break {
            AxisTieBreak::LowestAxis => extent[candidate] > extent[axis],
            AxisTieBreak::HighestAxis => extent[candidate] >= extent[axis],
        };
        if replace {
            axis = candidate;
        }
    }
    axis
}
