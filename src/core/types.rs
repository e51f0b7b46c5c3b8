/*!
 * Core Types
 * Common types used across the allocator
 */

/// Process ID type
pub type Pid = u32;

/// Offset of a block inside the pool
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;
