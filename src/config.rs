//! Build configuration
//!
//! The axis tie-break and the median search budget are empirical choices, so
//! they are exposed here instead of being baked into the builders.

use crate::constants::{build, dispatch};
use crate::error::{ErrorContext, HierarchyResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which axis wins when two bounding-box extents are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTieBreak {
    /// Evaluate x, y, z and replace only on a strictly larger extent
    LowestAxis,
    /// Evaluate x, y, z and replace on an equal or larger extent
    HighestAxis,
}

impl Default for AxisTieBreak {
    fn default() -> Self {
        Self::LowestAxis
    }
}

/// Record order of a packed GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackOrder {
    /// Dense indices in child-first, else next traversal order
    Traversal,
    /// Indices as assigned while building (face slots for disks,
    /// finalization order for elements)
    Build,
}

impl Default for PackOrder {
    fn default() -> Self {
        Self::Traversal
    }
}

/// Hierarchy build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub median_iterations: u32,
    pub axis_tie_break: AxisTieBreak,
    pub pack_order: PackOrder,
    pub thread_group_size: u32,
    /// Build a k-d tree over unmapped vertices instead of chaining them flat
    pub build_unmapped_tree: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            median_iterations: build::DEFAULT_MEDIAN_ITERATIONS,
            axis_tie_break: AxisTieBreak::default(),
            pack_order: PackOrder::default(),
            thread_group_size: dispatch::DEFAULT_THREAD_GROUP_SIZE,
            build_unmapped_tree: true,
        }
    }
}

impl HierarchyConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> HierarchyResult<Self> {
        let config: Self = toml::from_str(text)?;
        log::debug!("[HierarchyConfig::from_toml_str] Parsed {:?}", config);
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> HierarchyResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let text = std::fs::read_to_string(path.as_ref()).with_path(&path_str)?;
        Self::from_toml_str(&text)
    }

    /// Serialize the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.median_iterations == 0 {
            return Err(anyhow::anyhow!(
                "HierarchyConfig: median_iterations cannot be 0"
            ));
        }

        if self.median_iterations > build::MAX_MEDIAN_ITERATIONS {
            return Err(anyhow::anyhow!(
                "HierarchyConfig: median_iterations {} exceeds maximum of {}",
                self.median_iterations,
                build::MAX_MEDIAN_ITERATIONS
            ));
        }

        if self.thread_group_size == 0 {
            return Err(anyhow::anyhow!(
                "HierarchyConfig: thread_group_size cannot be 0"
            ));
        }

        if self.thread_group_size > dispatch::MAX_THREAD_GROUP_SIZE {
            return Err(anyhow::anyhow!(
                "HierarchyConfig: thread_group_size {} exceeds maximum of {}",
                self.thread_group_size,
                dispatch::MAX_THREAD_GROUP_SIZE
            ));
        }

        log::debug!("[HierarchyConfig] Configuration validated successfully");
        Ok(())
    }
}
