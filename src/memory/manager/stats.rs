/*!
 * Buddy Statistics
 * Usage accounting derived from the block tree
 */

use super::super::tree::{BlockId, BlockState};
use super::super::types::{MemoryPressure, MemoryStats};
use super::BuddyAllocator;
use crate::core::types::{Pid, Size};

impl BuddyAllocator {
    /// Total size of all allocated blocks
    pub fn used_memory(&self) -> Size {
        self.used_in(self.tree.root())
    }

    pub fn free_memory(&self) -> Size {
        self.max_size() - self.used_memory()
    }

    /// Percentage of the pool held by allocated blocks (0.0 to 100.0)
    pub fn usage_percent(&self) -> f64 {
        self.used_memory() as f64 / self.max_size() as f64 * 100.0
    }

    pub fn pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.used_memory() as f64 / self.max_size() as f64)
    }

    /// Height of the tree, 0 when the root is a leaf
    pub fn depth(&self) -> u32 {
        self.depth_of(self.tree.root())
    }

    /// Total block size held by `pid`
    pub fn process_memory(&self, pid: Pid) -> Size {
        self.iter()
            .filter(|(_, block)| block.owner() == Some(pid))
            .map(|(_, block)| block.size())
            .sum()
    }

    /// Aggregate statistics from a single pre-order pass
    pub fn stats(&self) -> MemoryStats {
        let mut used_memory = 0;
        let mut allocated_blocks = 0;
        let mut free_blocks = 0;
        let mut split_blocks = 0;
        let mut internal_fragmentation = 0;

        for (_, block) in self.iter() {
            match block.state() {
                BlockState::Allocated { .. } => {
                    used_memory += block.size();
                    internal_fragmentation += block.internal_fragmentation();
                    allocated_blocks += 1;
                }
                BlockState::Free => free_blocks += 1,
                BlockState::Split { .. } => split_blocks += 1,
            }
        }

        let total_memory = self.max_size();
        MemoryStats {
            total_memory,
            used_memory,
            free_memory: total_memory - used_memory,
            usage_percentage: used_memory as f64 / total_memory as f64 * 100.0,
            allocated_blocks,
            free_blocks,
            split_blocks,
            depth: self.depth(),
            internal_fragmentation,
        }
    }

    fn used_in(&self, id: BlockId) -> Size {
        let block = &self.tree[id];
        match block.state() {
            BlockState::Allocated { .. } => block.size(),
            BlockState::Split { left, right } => self.used_in(left) + self.used_in(right),
            BlockState::Free => 0,
        }
    }

    fn depth_of(&self, id: BlockId) -> u32 {
        match self.tree[id].children() {
            Some((left, right)) => 1 + self.depth_of(left).max(self.depth_of(right)),
            None => 0,
        }
    }
}
