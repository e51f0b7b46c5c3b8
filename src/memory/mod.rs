/*!
 * Memory Module
 * Buddy block tree, allocator and shared handle
 */

pub mod manager;
pub mod shared;
pub mod tree;
pub mod types;

// Re-export for convenience
pub use manager::{BlockSnapshot, BuddyAllocator, PreOrder};
pub use shared::SharedAllocator;
pub use tree::{Block, BlockId, BlockKind, BlockState, BlockTree};
pub use types::*;
