/*!
 * Block Tree
 *
 * Arena-backed binary tree of buddy blocks. Nodes live in a flat slot table and
 * refer to each other by [`BlockId`]; slots released by a merge are handed out
 * again by the next split. This module only maintains the shape of the tree,
 * placement policy lives in the allocator.
 */

mod block;

pub use block::{Block, BlockId, BlockKind, BlockState};

use crate::core::types::{Pid, Size};
use std::ops::Index;
use tracing::debug;

/// Binary tree of power-of-two blocks rooted at a block of `max_size`
#[derive(Debug, Clone)]
pub struct BlockTree {
    slots: Vec<Option<Block>>,
    vacant: Vec<usize>,
    root: BlockId,
    max_size: Size,
    min_size: Size,
}

impl BlockTree {
    pub fn new(max_size: Size, min_size: Size) -> Self {
        Self {
            slots: vec![Some(Block::new(max_size, 0, None))],
            vacant: Vec::new(),
            root: BlockId(0),
            max_size,
            min_size,
        }
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Number of live blocks, split blocks included
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every block except a free root
    pub fn reset(&mut self) {
        *self = Self::new(self.max_size, self.min_size);
    }

    /// Split a free block into two free buddies of half its size
    ///
    /// Returns `None` when the block is not a free leaf or when its halves would
    /// fall below the minimum block size.
    pub fn split(&mut self, id: BlockId) -> Option<(BlockId, BlockId)> {
        let (size, offset) = {
            let block = self.get(id)?;
            if !block.is_free() || block.size / 2 < self.min_size {
                return None;
            }
            (block.size, block.offset)
        };

        let half = size / 2;
        let left = self.insert(Block::new(half, offset, Some(id)));
        let right = self.insert(Block::new(half, offset + half, Some(id)));
        self.block_mut(id).state = BlockState::Split { left, right };

        debug!(block = id.0, size, half, "Split block");
        Some((left, right))
    }

    /// Collapse a split block whose two children are free leaves
    ///
    /// Returns false, leaving the tree untouched, when the block is not mergeable.
    pub fn merge(&mut self, id: BlockId) -> bool {
        let Some((left, right)) = self.get(id).and_then(Block::children) else {
            return false;
        };
        if !(self[left].is_free() && self[right].is_free()) {
            return false;
        }

        self.remove(left);
        self.remove(right);
        let block = self.block_mut(id);
        block.state = BlockState::Free;

        debug!(block = id.0, size = block.size, "Merged buddies");
        true
    }

    /// Mark a free leaf as owned by `pid`, remembering the requested size
    pub(crate) fn assign(&mut self, id: BlockId, pid: Pid, requested: Size) -> bool {
        let block = self.block_mut(id);
        if !block.is_free() {
            return false;
        }
        block.state = BlockState::Allocated { pid, requested };
        true
    }

    /// Return an allocated leaf to the free state
    pub(crate) fn unassign(&mut self, id: BlockId) -> Option<Pid> {
        let block = self.block_mut(id);
        let pid = block.owner()?;
        block.state = BlockState::Free;
        Some(pid)
    }

    fn insert(&mut self, block: Block) -> BlockId {
        match self.vacant.pop() {
            Some(index) => {
                self.slots[index] = Some(block);
                BlockId(index)
            }
            None => {
                self.slots.push(Some(block));
                BlockId(self.slots.len() - 1)
            }
        }
    }

    fn remove(&mut self, id: BlockId) {
        if self.slots[id.0].take().is_some() {
            self.vacant.push(id.0);
        }
    }

    fn block_mut(&mut self, id: BlockId) -> &mut Block {
        match self.slots.get_mut(id.0) {
            Some(Some(block)) => block,
            _ => panic!("stale block id {}", id.0),
        }
    }
}

impl Index<BlockId> for BlockTree {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        match self.get(id) {
            Some(block) => block,
            None => panic!("stale block id {}", id.0),
        }
    }
}
