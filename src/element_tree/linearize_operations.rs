//! Element Tree Linearization
//!
//! relocate: binary child/right tree -> child/next sibling chains
//! link:     last sibling of every chain -> node after the parent's subtree
//! update:   bottom-up fill of interior area/position/normal plus indices
//!
//! All three walk the arena with explicit stacks or flat passes, so a tree as
//! deep as its chart is large cannot overflow the call stack.

use super::element_data::{ElementNode, ElementSummary};
use super::element_operations::is_leaf;
use super::forest_operations::traversal_order;
use crate::constants::{build::MAX_RELOCATED_CHILDREN, NULL_INDEX};
use crate::error::{HierarchyResult, InvariantViolation};
use glam::Vec3;

/// Relocate the binary tree under `root` into child/next form
///
/// For each node, a leaf child is kept as is and an interior child is replaced
/// by its own two children, which trades depth for fan-out (at most four).
/// Replaced interior nodes stay in the arena but become unreachable. `right`
/// is cleared on every visited node.
pub fn relocate_element_tree(nodes: &mut [ElementNode], root: u32) -> HierarchyResult<()> {
    if root == NULL_INDEX {
        return Ok(());
    }

    let mut stack = vec![root];
    while let Some(element) = stack.pop() {
        let mut children = [NULL_INDEX; MAX_RELOCATED_CHILDREN];
        let mut count = 0usize;
        let node = nodes[element as usize];

        for side in [node.child, node.right] {
            if side == NULL_INDEX {
                continue;
            }
            let sub = nodes[side as usize];
            let promoted = if is_leaf(&sub) {
                [side, NULL_INDEX]
            } else {
                [sub.child, sub.right]
            };
            for candidate in promoted.into_iter().filter(|&c| c != NULL_INDEX) {
                if count == MAX_RELOCATED_CHILDREN {
                    return Err(InvariantViolation::FanOutExceeded {
                        children: count + 1,
                        max: MAX_RELOCATED_CHILDREN,
                    }
                    .into());
                }
                children[count] = candidate;
                count += 1;
            }
        }

        for i in 0..count {
            let next = children.get(i + 1).copied().unwrap_or(NULL_INDEX);
            nodes[children[i] as usize].next = next;
            stack.push(children[i]);
        }

        let node = &mut nodes[element as usize];
        node.child = children[0];
        node.right = NULL_INDEX;
    }
    Ok(())
}

/// Point the trailing `next` of every sibling chain past its parent's subtree
///
/// `head` starts a top-level chain; its last member continues at `next`.
/// Afterwards any node is left via `child` to descend or `next` to skip.
pub fn link_tree(nodes: &mut [ElementNode], head: u32, next: u32) {
    if head == NULL_INDEX {
        return;
    }

    let mut stack = vec![(head, next)];
    while let Some((first, after)) = stack.pop() {
        let mut ptr = first;
        loop {
            let node = nodes[ptr as usize];
            if node.child != NULL_INDEX {
                let continuation = if node.next != NULL_INDEX { node.next } else { after };
                stack.push((node.child, continuation));
            }
            if node.next == NULL_INDEX {
                nodes[ptr as usize].next = after;
                break;
            }
            ptr = node.next;
        }
    }
}

/// Fill interior nodes from their children and assign build-order indices
///
/// Leaves are final from the start. Each pass finalizes every interior node
/// whose children are all final: area is their sum, position their mean and
/// normal their normalized sum. `head` receives index 0, other leaves follow
/// in traversal order and interior nodes in the order they finalize.
pub fn update_all_elements(nodes: &mut [ElementNode], head: u32) -> HierarchyResult<ElementSummary> {
    let order = traversal_order(nodes, head)?;
    for &i in &order {
        let node = &mut nodes[i as usize];
        node.index = None;
        node.height = None;
    }

    let mut index = 1u32;
    let mut leaf_count = 0u32;
    for &i in &order {
        let node = &mut nodes[i as usize];
        if node.child == NULL_INDEX {
            node.height = Some(0);
            node.index = Some(if i == head {
                0
            } else {
                index += 1;
                index - 1
            });
            leaf_count += 1;
        }
    }

    let mut pending = order.len() - leaf_count as usize;
    let mut height = 0u32;
    while pending > 0 {
        height += 1;
        let mut finalized = 0usize;

        for &i in &order {
            let node = nodes[i as usize];
            if node.height.is_some() {
                continue;
            }

            let mut area = 0.0f32;
            let mut position = Vec3::ZERO;
            let mut normal = Vec3::ZERO;
            let mut child_count = 0u32;
            let mut ready = true;
            let mut c = node.child;
            while c != NULL_INDEX && c != node.next {
                let child = nodes[c as usize];
                if !matches!(child.height, Some(h) if h < height) {
                    ready = false;
                    break;
                }
                area += child.area;
                position += child.position;
                normal += child.normal;
                child_count += 1;
                c = child.next;
            }
            if !ready {
                continue;
            }

            let node = &mut nodes[i as usize];
            node.area = area;
            node.position = position / child_count.max(1) as f32;
            node.normal = normal.normalize_or_zero();
            node.height = Some(height);
            node.index = Some(if i == head {
                0
            } else {
                index += 1;
                index - 1
            });
            finalized += 1;
        }

        if finalized == 0 {
            let stuck = order
                .iter()
                .copied()
                .find(|&i| nodes[i as usize].height.is_none())
                .unwrap_or(NULL_INDEX);
            return Err(InvariantViolation::UnfinalizedElement { node: stuck }.into());
        }
        pending -= finalized;
    }

    Ok(ElementSummary {
        total_elements: order.len() as u32,
        leaf_count,
        max_height: height,
    })
}
