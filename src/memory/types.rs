/*!
 * Memory Types
 * Common types for buddy memory management
 */

use crate::core::limits::{PRESSURE_CRITICAL, PRESSURE_HIGH, PRESSURE_MEDIUM};
use crate::core::types::{Address, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every failure leaves the block tree exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Requested {requested} units, but the whole pool is only {pool} units")]
    #[diagnostic(
        code(memory::size_exceeds_pool),
        help("No block larger than the pool can ever exist.")
    )]
    SizeExceedsPool { requested: Size, pool: Size },

    #[error("No free block can hold {requested} units")]
    #[diagnostic(
        code(memory::no_fit),
        help("Release some processes so their buddies can coalesce into larger blocks.")
    )]
    NoFit { requested: Size },

    #[error("Process {0} does not own any block")]
    #[diagnostic(code(memory::not_found))]
    NotFound(Pid),

    #[error("Allocation size must be positive")]
    #[diagnostic(code(memory::zero_size))]
    ZeroSize,
}

/// A successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub pid: Pid,
    /// Offset of the block inside the pool
    pub offset: Address,
    /// Size of the block the request landed in
    pub block_size: Size,
    /// Size originally requested
    pub requested: Size,
}

impl Allocation {
    /// Bytes wasted inside the block
    pub fn internal_fragmentation(&self) -> Size {
        self.block_size - self.requested
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub split_blocks: usize,
    /// Height of the block tree (a lone root is 0)
    pub depth: u32,
    /// Units allocated but not requested, summed over allocated blocks
    pub internal_fragmentation: Size,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
