//! Error handling for hierarchy construction
//!
//! Every failure a mesh build can hit is a `HierarchyError`. Geometric
//! degeneracies (zero-area triangles, empty charts, NaN blends) are not errors:
//! the builders recover from them locally and only log.

use std::error::Error as StdError;
use std::fmt;

/// Main error type for mesh loading and hierarchy construction
#[derive(Debug)]
pub enum HierarchyError {
    // Input Errors
    IoError {
        path: String,
        error: String,
    },
    ParseError {
        line: usize,
        token: String,
        expected: String,
    },
    MalformedFace {
        line: usize,
        reason: String,
    },

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // Build Errors
    Invariant(InvariantViolation),
}

/// Structural guarantees of the trees and packed buffers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("packed buffer holds {actual} records but the build recorded {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("partition of {len} elements left one side empty")]
    DegeneratePartition { len: usize },

    #[error("traversal did not terminate within {steps} steps")]
    TraversalCycle { steps: usize },

    #[error("node gathered {children} children (max {max})")]
    FanOutExceeded { children: usize, max: usize },

    #[error("element node {node} was never finalized")]
    UnfinalizedElement { node: u32 },
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyError::IoError { path, error } => {
                write!(f, "IO error for {}: {}", path, error)
            }
            HierarchyError::ParseError {
                line,
                token,
                expected,
            } => write!(
                f,
                "Parse error on line {}: '{}' is not a valid {}",
                line, token, expected
            ),
            HierarchyError::MalformedFace { line, reason } => {
                write!(f, "Malformed face on line {}: {}", line, reason)
            }

            HierarchyError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            HierarchyError::Invariant(violation) => {
                write!(f, "Invariant violated: {}", violation)
            }
        }
    }
}

impl StdError for HierarchyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            HierarchyError::Invariant(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Type alias for Results in hierarchy construction
pub type HierarchyResult<T> = Result<T, HierarchyError>;

impl From<std::io::Error> for HierarchyError {
    fn from(error: std::io::Error) -> Self {
        HierarchyError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<InvariantViolation> for HierarchyError {
    fn from(violation: InvariantViolation) -> Self {
        HierarchyError::Invariant(violation)
    }
}

impl From<toml::de::Error> for HierarchyError {
    fn from(error: toml::de::Error) -> Self {
        HierarchyError::InvalidConfig {
            field: "<toml>".to_string(),
            value: String::new(),
            reason: error.to_string(),
        }
    }
}

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_hierarchy<F>(self, f: F) -> HierarchyResult<T>
    where
        F: FnOnce() -> HierarchyError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_hierarchy<F>(self, f: F) -> HierarchyResult<T>
    where
        F: FnOnce() -> HierarchyError,
    {
        self.ok_or_else(f)
    }
}

/// Attach a file path to IO failures
pub trait ErrorContext<T> {
    fn with_path(self, path: &str) -> HierarchyResult<T>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &str) -> HierarchyResult<T> {
        self.map_err(|e| HierarchyError::IoError {
            path: path.to_string(),
            error: e.to_string(),
        })
    }
}
