/*!
 * Buddy Allocation
 * Search, split and placement logic
 */

use super::super::tree::{BlockId, BlockState};
use super::super::types::{Allocation, MemoryError, MemoryPressure, MemoryResult};
use super::BuddyAllocator;
use crate::core::types::{Pid, Size};
use tracing::{info, warn, Level};

impl BuddyAllocator {
    /// Place `size` units for `pid` in the leftmost smallest block that fits
    ///
    /// A pid is not checked for existing allocations; calling this twice for
    /// the same pid places two independent blocks.
    pub fn allocate(&mut self, pid: Pid, size: Size) -> MemoryResult<Allocation> {
        if size == 0 {
            warn!(pid, "Rejected zero-sized allocation");
            return Err(MemoryError::ZeroSize);
        }

        let pool = self.max_size();
        if size > pool {
            warn!(
                pid,
                requested = size,
                pool,
                "Allocation larger than the whole pool"
            );
            return Err(MemoryError::SizeExceedsPool {
                requested: size,
                pool,
            });
        }

        let Some(id) = self.place(self.tree.root(), pid, size) else {
            warn!(
                pid,
                requested = size,
                free = self.free_memory(),
                "No free block can hold the request"
            );
            return Err(MemoryError::NoFit { requested: size });
        };

        let block = &self.tree[id];
        let allocation = Allocation {
            pid,
            offset: block.offset(),
            block_size: block.size(),
            requested: size,
        };

        self.log_allocation(&allocation);
        Ok(allocation)
    }

    /// Pressure needs a full walk of the tree, so it is only computed when
    /// the event would actually be recorded
    fn log_allocation(&self, allocation: &Allocation) {
        if !tracing::enabled!(Level::WARN) {
            return;
        }

        let pool = self.max_size();
        let used = self.used_memory();
        let pressure = MemoryPressure::from_ratio(used as f64 / pool as f64);
        if pressure == MemoryPressure::Low {
            info!(
                pid = allocation.pid,
                requested = allocation.requested,
                block_size = allocation.block_size,
                offset = allocation.offset,
                "Allocated block"
            );
        } else {
            warn!(
                pid = allocation.pid,
                requested = allocation.requested,
                block_size = allocation.block_size,
                offset = allocation.offset,
                used,
                pool,
                %pressure,
                "Allocated block under memory pressure"
            );
        }
    }

    /// Depth-first search for a block, splitting free blocks on the way down
    ///
    /// A split only happens when its left half can hold the request, so a
    /// failed search never leaves new blocks behind.
    fn place(&mut self, id: BlockId, pid: Pid, size: Size) -> Option<BlockId> {
        let (state, block_size) = {
            let block = &self.tree[id];
            (block.state(), block.size())
        };

        match state {
            BlockState::Allocated { .. } => None,
            BlockState::Split { left, right } => self
                .place(left, pid, size)
                .or_else(|| self.place(right, pid, size)),
            BlockState::Free => {
                let half = block_size / 2;
                if half >= self.min_size() && half >= size {
                    let (left, right) = self.tree.split(id)?;
                    self.place(left, pid, size)
                        .or_else(|| self.place(right, pid, size))
                } else if block_size >= size {
                    self.tree.assign(id, pid, size).then_some(id)
                } else {
                    None
                }
            }
        }
    }
}
