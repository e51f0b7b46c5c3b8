/*!
 * Buddy Release
 * Freeing blocks and bottom-up coalescing
 */

use super::super::tree::BlockId;
use super::super::types::{MemoryError, MemoryResult};
use super::BuddyAllocator;
use crate::core::types::{Pid, Size};
use tracing::{debug, info, warn};

impl BuddyAllocator {
    /// Free the first block owned by `pid` in pre-order and coalesce upwards
    ///
    /// Returns the size of the freed block. Only one block is released per
    /// call even if `pid` holds several; see [`BuddyAllocator::free_process_memory`].
    pub fn release(&mut self, pid: Pid) -> MemoryResult<Size> {
        let Some(id) = self.find_block(pid) else {
            warn!(pid, "Attempted to release a pid that owns no block");
            return Err(MemoryError::NotFound(pid));
        };

        let (size, offset, parent) = {
            let block = &self.tree[id];
            (block.size(), block.offset(), block.parent())
        };
        self.tree.unassign(id);
        let merged = self.coalesce(parent);

        info!(
            pid,
            size,
            offset,
            merged_levels = merged,
            "Released block"
        );
        Ok(size)
    }

    /// Release every block owned by `pid`, returning the total size freed
    ///
    /// Returns 0 when the pid owns nothing.
    pub fn free_process_memory(&mut self, pid: Pid) -> Size {
        let mut freed_bytes = 0;
        let mut freed_count = 0;
        while let Ok(size) = self.release(pid) {
            freed_bytes += size;
            freed_count += 1;
        }

        if freed_count > 0 {
            info!(
                pid,
                freed_bytes, freed_count, "Cleaned up all blocks of process"
            );
        }
        freed_bytes
    }

    /// First block owned by `pid` in pre-order
    pub fn find_block(&self, pid: Pid) -> Option<BlockId> {
        self.iter()
            .find(|(_, block)| block.owner() == Some(pid))
            .map(|(id, _)| id)
    }

    /// Merge buddies starting at `parent` until a level cannot merge
    fn coalesce(&mut self, mut parent: Option<BlockId>) -> usize {
        let mut merged = 0;
        while let Some(id) = parent {
            if !self.tree.merge(id) {
                break;
            }
            merged += 1;
            parent = self.tree[id].parent();
        }

        if merged > 0 {
            debug!(levels = merged, "Coalesced free buddies");
        }
        merged
    }
}
