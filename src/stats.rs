/// Hierarchy statistics shared by the disk and element trees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HierarchyStats {
    /// Reachable nodes (leaves and interior)
    pub node_count: u32,
    pub leaf_count: u32,
    /// Longest root-to-leaf path in edges
    pub max_depth: u32,
    /// Size of the packed GPU records
    pub memory_usage_kb: f32,
}
