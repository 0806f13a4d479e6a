//! Element Forest Operations - Pure DOP Functions
//!
//! One k-d tree per chart, then one for the unmapped vertices. Chart roots are
//! chained through `next` into a single top-level chain before linking.

use super::element_data::{ElementForest, ElementNode, ElementSummary};
use super::element_operations::{create_element_tree, push_element_list};
use super::linearize_operations::{link_tree, relocate_element_tree, update_all_elements};
use crate::config::HierarchyConfig;
use crate::constants::{NULL_INDEX, UNMAPPED_CHART};
use crate::error::{HierarchyResult, InvariantViolation};
use crate::gpu::GpuElement;
use crate::stats::HierarchyStats;
use crate::surface::{ChartAssignment, SurfaceVertex};

/// Build, relocate, link and aggregate the element forest of a mesh
pub fn build_element_forest(
    vertices: &[SurfaceVertex],
    charts: &ChartAssignment,
    config: &HierarchyConfig,
) -> HierarchyResult<ElementForest> {
    let mut nodes: Vec<ElementNode> = Vec::with_capacity(vertices.len() * 2);
    let mut roots: Vec<u32> = Vec::new();

    for chart_id in 1..=charts.chart_count {
        let list = push_element_list(&mut nodes, vertices, chart_id);
        if list.is_empty() {
            log::warn!("[build_element_forest] Chart {} has no vertices, skipping", chart_id);
            continue;
        }
        let size = list.len();
        let root = create_element_tree(&mut nodes, list, config.median_iterations)?;
        relocate_element_tree(&mut nodes, root)?;
        roots.push(root);
        log::trace!("[build_element_forest] Chart {} built over {} elements", chart_id, size);
    }

    let unmapped = push_element_list(&mut nodes, vertices, UNMAPPED_CHART);
    if !unmapped.is_empty() {
        log::debug!(
            "[build_element_forest] {} unmapped vertices ({})",
            unmapped.len(),
            if config.build_unmapped_tree { "tree" } else { "flat" }
        );
        if config.build_unmapped_tree {
            let root = create_element_tree(&mut nodes, unmapped, config.median_iterations)?;
            relocate_element_tree(&mut nodes, root)?;
            roots.push(root);
        } else {
            roots.extend(unmapped);
        }
    }

    for pair in roots.windows(2) {
        nodes[pair[0] as usize].next = pair[1];
    }
    let head = roots.first().copied().unwrap_or(NULL_INDEX);
    link_tree(&mut nodes, head, NULL_INDEX);

    let summary = if head == NULL_INDEX {
        ElementSummary::default()
    } else {
        update_all_elements(&mut nodes, head)?
    };

    log::info!(
        "[build_element_forest] Built {} elements ({} leaves, {} top-level trees, height {})",
        summary.total_elements,
        summary.leaf_count,
        roots.len(),
        summary.max_height
    );

    Ok(ElementForest {
        nodes,
        head,
        summary,
    })
}

/// Nodes reachable from `head`, visiting `child` first and `next` otherwise
///
/// On a linked forest this is a pre-order walk that meets every node exactly
/// once. More steps than arena slots means a cycle.
pub fn traversal_order(nodes: &[ElementNode], head: u32) -> HierarchyResult<Vec<u32>> {
    let mut order = Vec::new();
    let mut ptr = head;
    while ptr != NULL_INDEX {
        if order.len() >= nodes.len() {
            return Err(InvariantViolation::TraversalCycle { steps: order.len() }.into());
        }
        order.push(ptr);
        let node = &nodes[ptr as usize];
        ptr = if node.child != NULL_INDEX { node.child } else { node.next };
    }
    Ok(order)
}

/// Get element forest statistics
pub fn element_forest_stats(forest: &ElementForest) -> HierarchyStats {
    let summary = &forest.summary;
    HierarchyStats {
        node_count: summary.total_elements,
        leaf_count: summary.leaf_count,
        // a node finalizes one pass after its deepest child
        max_depth: summary.max_height,
        memory_usage_kb: (summary.total_elements as usize * std::mem::size_of::<GpuElement>())
            as f32
            / 1024.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::parse_obj_str;
    use crate::surface::{aggregate_vertices, assign_charts, total_vertex_area};
    use glam::{Vec2, Vec3};

    fn vertex(x: f32, chart_id: u32) -> SurfaceVertex {
        SurfaceVertex {
            position: Vec3::new(x, 0.0, 0.0),
            normal: Vec3::Y,
            separator: Vec2::new(x * 0.01, 0.5),
            area: 0.5,
            chart_id,
        }
    }

    fn forest_for(vertices: &[SurfaceVertex], chart_count: u32, config: &HierarchyConfig) -> ElementForest {
        let charts = ChartAssignment {
            chart_count,
            texcoord_charts: Vec::new(),
        };
        build_element_forest(vertices, &charts, config).unwrap()
    }

    /// Every child chain must end at the parent's `next`
    fn assert_linked(forest: &ElementForest) {
        let order = traversal_order(&forest.nodes, forest.head).unwrap();
        for &i in &order {
            let node = forest.nodes[i as usize];
            if node.child == NULL_INDEX {
                continue;
            }
            let mut c = node.child;
            loop {
                let child = forest.nodes[c as usize];
                if child.next == node.next {
                    break;
                }
                assert_ne!(child.next, NULL_INDEX, "chain under {} ends early", i);
                c = child.next;
            }
        }
    }

    #[test]
    fn test_empty_forest() {
        let forest = forest_for(&[], 0, &HierarchyConfig::default());
        assert_eq!(forest.head, NULL_INDEX);
        assert_eq!(forest.summary, ElementSummary::default());
        assert!(traversal_order(&forest.nodes, forest.head).unwrap().is_empty());
    }

    #[test]
    fn test_single_vertex_chart() {
        let forest = forest_for(&[vertex(0.0, 1)], 1, &HierarchyConfig::default());
        assert_eq!(forest.summary.total_elements, 1);
        assert_eq!(forest.summary.leaf_count, 1);
        let head = forest.nodes[forest.head as usize];
        assert_eq!(head.next, NULL_INDEX);
        assert_eq!(head.child, NULL_INDEX);
        assert_eq!(head.index, Some(0));
    }

    #[test]
    fn test_charts_are_chained_and_linked() {
        let mut vertices = Vec::new();
        for i in 0..30 {
            vertices.push(vertex(i as f32, 1 + i % 3));
        }
        for i in 30..40 {
            vertices.push(vertex(i as f32, UNMAPPED_CHART));
        }
        let forest = forest_for(&vertices, 3, &HierarchyConfig::default());
        assert_eq!(forest.summary.leaf_count, 40);
        assert_linked(&forest);

        // four top-level roots hang off one chain that ends the walk
        let mut roots = vec![forest.head];
        while let Some(&last) = roots.last() {
            let next = forest.nodes[last as usize].next;
            if next == NULL_INDEX {
                break;
            }
            roots.push(next);
        }
        assert_eq!(roots.len(), 4);
        let areas: Vec<f32> = roots.iter().map(|&r| forest.nodes[r as usize].area).collect();
        assert_eq!(areas, vec![5.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_flat_unmapped_chain() {
        let vertices: Vec<SurfaceVertex> = (0..6).map(|i| vertex(i as f32, UNMAPPED_CHART)).collect();
        let config = HierarchyConfig {
            build_unmapped_tree: false,
            ..Default::default()
        };
        let forest = forest_for(&vertices, 0, &config);
        let order = traversal_order(&forest.nodes, forest.head).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(forest.summary.total_elements, 6);
        assert_eq!(forest.summary.max_height, 0);
    }

    #[test]
    fn test_empty_chart_is_skipped() {
        let forest = forest_for(&[vertex(0.0, 2), vertex(1.0, 2)], 3, &HierarchyConfig::default());
        assert_eq!(forest.summary.leaf_count, 2);
        assert_eq!(forest.summary.total_elements, 3);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut nodes = vec![ElementNode::EMPTY; 2];
        nodes[0].next = 1;
        nodes[1].next = 0;
        let err = traversal_order(&nodes, 0).unwrap_err();
        assert!(err.to_string().contains("did not terminate"));
    }

    #[test]
    fn test_leaf_area_matches_mesh_area() {
        let mesh = parse_obj_str(
            "v 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\nv 4 0 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             f 1/1 2/2 3/3\nf 1/1 3/3 4/4\nf 2 5 3\n",
        )
        .unwrap();
        let mut vertices = aggregate_vertices(&mesh);
        let charts = assign_charts(&mesh, &mut vertices);
        let forest = build_element_forest(&vertices, &charts, &HierarchyConfig::default()).unwrap();
        assert_linked(&forest);

        let order = traversal_order(&forest.nodes, forest.head).unwrap();
        let leaf_area: f32 = order
            .iter()
            .map(|&i| forest.nodes[i as usize])
            .filter(|n| n.child == NULL_INDEX)
            .map(|n| n.area)
            .sum();
        assert!((leaf_area - total_vertex_area(&vertices)).abs() < 1e-5);
        assert!((leaf_area - 6.0).abs() < 1e-5);

        let stats = element_forest_stats(&forest);
        assert_eq!(stats.leaf_count, 5);
        assert_eq!(stats.node_count, forest.summary.total_elements);
        assert!(stats.memory_usage_kb > 0.0);
    }
}
