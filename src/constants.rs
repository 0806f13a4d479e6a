//! Shared constants for hierarchy construction and GPU packing
//!
//! The null-index values are part of the wire contract with the shaders that
//! walk the packed buffers and must not change.

/// Null link for the unsigned (disk tree) records
pub const NULL_INDEX: u32 = u32::MAX;

/// Null link for the signed (surface element) records
pub const NULL_INDEX_SIGNED: i32 = -1;

/// Chart id of vertices never reached by the texture flood fill
pub const UNMAPPED_CHART: u32 = 0;

/// Hierarchy tuning defaults
pub mod build {
    /// Bisection budget for the element median search
    pub const DEFAULT_MEDIAN_ITERATIONS: u32 = 20;

    /// Upper bound accepted for the median search budget
    pub const MAX_MEDIAN_ITERATIONS: u32 = 64;

    /// Slots available to a node while it is relocated into child/next form.
    /// A binary node can promote at most four grandchildren.
    pub const MAX_RELOCATED_CHILDREN: usize = 5;
}

/// Compute dispatch defaults
pub mod dispatch {
    /// Local work-group size of the occlusion compute shaders
    pub const DEFAULT_THREAD_GROUP_SIZE: u32 = 32;

    /// Largest local work-group size accepted by configuration
    pub const MAX_THREAD_GROUP_SIZE: u32 = 1024;
}
