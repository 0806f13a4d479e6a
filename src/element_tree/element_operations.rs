//! Element k-d Tree Construction
//!
//! Splits a chart's elements on the wider texture-coordinate dimension at an
//! approximate median found by bisecting on value. The result is a binary tree
//! in child/right form whose leaves are the input elements and whose
//! interior nodes carry no data yet.

use super::element_data::{ElementNode, MedianSplit};
use crate::constants::NULL_INDEX;
use crate::error::{HierarchyResult, InvariantViolation};
use crate::geometry::{aabb2_extent, aabb_from_points2, AABB2};
use crate::surface::{chart_members, SurfaceVertex};

/// Check if an element node is a leaf (no child and no right subtree)
pub fn is_leaf(node: &ElementNode) -> bool {
    node.child == NULL_INDEX && node.right == NULL_INDEX
}

/// Append one leaf per vertex of `chart_id` and return their arena indices
pub fn push_element_list(
    nodes: &mut Vec<ElementNode>,
    vertices: &[SurfaceVertex],
    chart_id: u32,
) -> Vec<u32> {
    let members = chart_members(vertices, chart_id);
    let mut list = Vec::with_capacity(members.len());
    for v in members.iter().map(|&m| &vertices[m as usize]) {
        list.push(nodes.len() as u32);
        nodes.push(ElementNode {
            area: v.area,
            position: v.position,
            normal: v.normal,
            separator: v.separator,
            ..ElementNode::EMPTY
        });
    }
    list
}

/// Texture-coordinate bounds of a list of elements
pub fn element_bounds(nodes: &[ElementNode], list: &[u32]) -> AABB2 {
    aabb_from_points2(list.iter().map(|&i| nodes[i as usize].separator))
}

/// Approximate the median of `list` along `dimension` by bisection on value
///
/// Starts from `[left, right]` and stops once the count of elements strictly
/// below the candidate is floor(n/2) or ceil(n/2), or after `max_iterations`
/// candidates.
pub fn find_median(
    nodes: &[ElementNode],
    list: &[u32],
    dimension: usize,
    mut left: f32,
    mut right: f32,
    max_iterations: u32,
) -> MedianSplit {
    let n = list.len();
    let h0 = n / 2;
    let h1 = if n % 2 == 1 { h0 + 1 } else { h0 };

    let mut split = MedianSplit {
        value: (left + right) * 0.5,
        below: 0,
        iterations: 0,
        converged: false,
    };
    while split.iterations < max_iterations.max(1) {
        split.value = (left + right) * 0.5;
        split.below = list
            .iter()
            .filter(|&&i| nodes[i as usize].separator[dimension] < split.value)
            .count();
        split.iterations += 1;

        if split.below == h0 || split.below == h1 {
            split.converged = true;
            break;
        }
        if split.below < h0 {
            left = split.value;
        } else {
            right = split.value;
        }
    }
    split
}

/// Split `list` around `median`, forcing both halves to be non-empty
///
/// If every element lands on one side, the element with the most extreme
/// coordinate toward the empty side is moved across.
fn partition(
    nodes: &[ElementNode],
    list: Vec<u32>,
    dimension: usize,
    median: f32,
) -> HierarchyResult<(Vec<u32>, Vec<u32>)> {
    let len = list.len();
    let coordinate = |i: u32| nodes[i as usize].separator[dimension];
    let (mut left, mut right): (Vec<u32>, Vec<u32>) =
        list.into_iter().partition(|&i| coordinate(i) < median);

    if left.is_empty() {
        let lowest = right
            .iter()
            .enumerate()
            .min_by(|a, b| coordinate(*a.1).total_cmp(&coordinate(*b.1)))
            .map(|(pos, _)| pos);
        if let Some(pos) = lowest {
            left.push(right.remove(pos));
        }
    } else if right.is_empty() {
        let highest = left
            .iter()
            .enumerate()
            .max_by(|a, b| coordinate(*a.1).total_cmp(&coordinate(*b.1)))
            .map(|(pos, _)| pos);
        if let Some(pos) = highest {
            right.push(left.remove(pos));
        }
    }

    if left.is_empty() || right.is_empty() {
        return Err(InvariantViolation::DegeneratePartition { len }.into());
    }
    Ok((left, right))
}

enum Slot {
    Root,
    Child(u32),
    Right(u32),
}

/// Build a binary child/right tree over `list`
///
/// Returns the root index (`NULL_INDEX` for an empty list, the element itself
/// for a single element). Uses an explicit work stack: charts whose
/// coordinates coincide degrade to a chain as deep as the chart is large.
pub fn create_element_tree(
    nodes: &mut Vec<ElementNode>,
    list: Vec<u32>,
    max_iterations: u32,
) -> HierarchyResult<u32> {
    let mut root = NULL_INDEX;
    let mut unconverged = 0usize;
    let mut stack = vec![(list, Slot::Root)];

    while let Some((list, slot)) = stack.pop() {
        let node = if list.len() <= 1 {
            list.first().copied().unwrap_or(NULL_INDEX)
        } else {
            let bounds = element_bounds(nodes, &list);
            let extent = aabb2_extent(&bounds);
            let dimension = if extent.x < extent.y { 1 } else { 0 };
            let split = find_median(
                nodes,
                &list,
                dimension,
                bounds.min[dimension],
                bounds.max[dimension],
                max_iterations,
            );
            if !split.converged {
                unconverged += 1;
            }

            let (left, right) = partition(nodes, list, dimension, split.value)?;
            let parent = nodes.len() as u32;
            nodes.push(ElementNode::EMPTY);
            stack.push((right, Slot::Right(parent)));
            stack.push((left, Slot::Child(parent)));
            parent
        };

        match slot {
            Slot::Root => root = node,
            Slot::Child(parent) => nodes[parent as usize].child = node,
            Slot::Right(parent) => nodes[parent as usize].right = node,
        }
    }

    if unconverged > 0 {
        log::debug!(
            "[create_element_tree] {} splits used the median budget without converging",
            unconverged
        );
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn leaves(separators: &[Vec2]) -> (Vec<ElementNode>, Vec<u32>) {
        let nodes: Vec<ElementNode> = separators
            .iter()
            .map(|&separator| ElementNode {
                area: 1.0,
                separator,
                ..ElementNode::EMPTY
            })
            .collect();
        let list = (0..nodes.len() as u32).collect();
        (nodes, list)
    }

    fn count_leaves(nodes: &[ElementNode], root: u32) -> usize {
        let mut stack = vec![root];
        let mut count = 0;
        while let Some(i) = stack.pop() {
            if i == NULL_INDEX {
                continue;
            }
            let n = nodes[i as usize];
            if is_leaf(&n) {
                count += 1;
            } else {
                stack.push(n.child);
                stack.push(n.right);
            }
        }
        count
    }

    #[test]
    fn test_median_converges_on_uniform_chart() {
        let mut rng = StdRng::seed_from_u64(7);
        for &n in &[2usize, 3, 10, 101, 1000, 4097] {
            let separators: Vec<Vec2> = (0..n).map(|_| Vec2::new(rng.gen::<f32>(), 0.0)).collect();
            let (nodes, list) = leaves(&separators);
            let bounds = element_bounds(&nodes, &list);
            let split = find_median(&nodes, &list, 0, bounds.min.x, bounds.max.x, 20);
            assert!(split.converged, "n = {}", n);
            assert!(split.iterations <= 20);
            let above = n - split.below;
            assert!((split.below as i64 - above as i64).abs() <= 1, "n = {}", n);
        }
    }

    #[test]
    fn test_median_on_even_grid() {
        let separators: Vec<Vec2> = (0..64).map(|i| Vec2::new(0.0, i as f32 / 63.0)).collect();
        let (nodes, list) = leaves(&separators);
        let split = find_median(&nodes, &list, 1, 0.0, 1.0, 20);
        assert!(split.converged);
        assert_eq!(split.below, 32);
        assert_eq!(split.iterations, 1);
    }

    #[test]
    fn test_median_budget_is_respected() {
        let separators = vec![Vec2::splat(0.5); 8];
        let (nodes, list) = leaves(&separators);
        let split = find_median(&nodes, &list, 0, 0.5, 0.5, 20);
        assert!(!split.converged);
        assert_eq!(split.iterations, 20);
        assert_eq!(split.below, 0);
    }

    #[test]
    fn test_empty_and_single() {
        let (mut nodes, _) = leaves(&[Vec2::ZERO]);
        assert_eq!(create_element_tree(&mut nodes, Vec::new(), 20).unwrap(), NULL_INDEX);
        assert_eq!(create_element_tree(&mut nodes, vec![0], 20).unwrap(), 0);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_tree_keeps_every_leaf() {
        let mut rng = StdRng::seed_from_u64(42);
        let separators: Vec<Vec2> = (0..257)
            .map(|_| Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()))
            .collect();
        let (mut nodes, list) = leaves(&separators);
        let root = create_element_tree(&mut nodes, list, 20).unwrap();
        assert_eq!(count_leaves(&nodes, root), 257);
        // a binary tree over n leaves has n - 1 interior nodes
        assert_eq!(nodes.len(), 257 + 256);
        for n in &nodes[257..] {
            assert_ne!(n.child, NULL_INDEX);
            assert_ne!(n.right, NULL_INDEX);
        }
    }

    #[test]
    fn test_coincident_coordinates_do_not_recurse_forever() {
        let separators = vec![Vec2::ZERO; 2000];
        let (mut nodes, list) = leaves(&separators);
        let root = create_element_tree(&mut nodes, list, 20).unwrap();
        assert_eq!(count_leaves(&nodes, root), 2000);
    }

    #[test]
    fn test_split_uses_wider_dimension() {
        let separators = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.1, 1.0),
            Vec2::new(0.2, 2.0),
            Vec2::new(0.3, 3.0),
        ];
        let (mut nodes, list) = leaves(&separators);
        let root = create_element_tree(&mut nodes, list, 20).unwrap();
        let r = nodes[root as usize];
        let low = nodes[r.child as usize];
        let high = nodes[r.right as usize];
        // both halves split on y: {0, 1} and {2, 3}
        let mut low_leaves = vec![low.child, low.right];
        let mut high_leaves = vec![high.child, high.right];
        low_leaves.sort();
        high_leaves.sort();
        assert_eq!(low_leaves, vec![0, 1]);
        assert_eq!(high_leaves, vec![2, 3]);
    }
}
