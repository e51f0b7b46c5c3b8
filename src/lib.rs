/*!
 * Buddy System Library
 * Buddy-block memory allocator with a shell front end
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;

// Re-exports
pub use crate::core::{BuddyConfig, ConfigError, Pid, Size};
pub use memory::{Allocation, BuddyAllocator, MemoryError, MemoryResult, MemoryStats, SharedAllocator};
pub use monitoring::init_tracing;
pub use shell::{Command, Reply, Session};
