/*!
 * Buddy Allocator
 *
 * Manages a fixed pool as a binary tree of power-of-two blocks.
 *
 * ## Placement
 *
 * - Depth-first, left before right: the leftmost eligible block always wins,
 *   so placement is deterministic and reproducible
 * - A free block is halved while its half still holds the request and is not
 *   below the minimum block size, so every request lands in the smallest
 *   power-of-two block that fits (internal fragmentation < 50%)
 *
 * ## Release
 *
 * - Frees the first block owned by the pid in pre-order
 * - Coalesces buddies bottom-up: the chain may collapse several levels at once
 *
 * ## Accounting
 *
 * - Used memory is summed from the tree on demand, never cached, so statistics
 *   cannot drift from the tree shape
 * - Per-process totals, pressure levels and depth come from the same walk
 *
 * The allocator is single-threaded. Hosts that share it across threads wrap it
 * in [`SharedAllocator`](crate::memory::SharedAllocator).
 */

mod allocator;
mod release;
mod snapshot;
mod stats;
mod traversal;

pub use snapshot::BlockSnapshot;
pub use traversal::PreOrder;

use super::tree::{Block, BlockId, BlockTree};
use super::types::{MemoryError, MemoryResult};
use crate::core::config::{BuddyConfig, ConfigError};
use crate::core::types::Size;
use tracing::info;

/// Buddy memory allocator
#[derive(Debug, Clone)]
pub struct BuddyAllocator {
    tree: BlockTree,
}

impl BuddyAllocator {
    /// Create an allocator over a pool of `max_size` units
    ///
    /// The geometry is trusted: `min_size < max_size` and both powers of two.
    /// Use [`BuddyAllocator::from_config`] to have it checked first.
    pub fn new(max_size: Size, min_size: Size) -> Self {
        info!(
            max_size,
            min_size, "Buddy allocator initialized with a single free block"
        );
        Self {
            tree: BlockTree::new(max_size, min_size),
        }
    }

    /// Create an allocator from a validated configuration
    pub fn from_config(config: &BuddyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.max_size, config.min_size))
    }

    pub fn max_size(&self) -> Size {
        self.tree.max_size()
    }

    pub fn min_size(&self) -> Size {
        self.tree.min_size()
    }

    /// Read-only view of the block tree
    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn root(&self) -> &Block {
        &self.tree[self.tree.root()]
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.tree.get(id)
    }

    /// Discard every allocation and return to a single free block
    pub fn reset(&mut self) {
        self.tree.reset();
        info!(max_size = self.max_size(), "Buddy allocator reset");
    }

    /// Size of the block a request of `size` units would land in on an empty
    /// pool, or an error if it could never fit
    pub fn block_size_for(&self, size: Size) -> MemoryResult<Size> {
        if size == 0 {
            return Err(MemoryError::ZeroSize);
        }
        if size > self.max_size() {
            return Err(MemoryError::SizeExceedsPool {
                requested: size,
                pool: self.max_size(),
            });
        }
        Ok(size.next_power_of_two().max(self.min_size()))
    }
}

impl Default for BuddyAllocator {
    fn default() -> Self {
        let config = BuddyConfig::default();
        Self::new(config.max_size, config.min_size)
    }
}
