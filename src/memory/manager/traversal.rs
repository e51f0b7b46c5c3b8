/*!
 * Buddy Traversal
 * Pre-order enumeration of the block tree
 */

use super::super::tree::{Block, BlockId, BlockTree};
use super::BuddyAllocator;

/// Pre-order iterator over every block, split blocks included
///
/// Borrows the allocator, so the tree cannot change while it is enumerated.
/// Calling [`BuddyAllocator::iter`] again restarts from the root.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    tree: &'a BlockTree,
    stack: Vec<BlockId>,
}

impl<'a> PreOrder<'a> {
    fn new(tree: &'a BlockTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let block = &self.tree[id];
        // right first so the left child is popped next
        if let Some((left, right)) = block.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some((id, block))
    }
}

impl BuddyAllocator {
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.tree)
    }

    /// Allocated blocks in pre-order
    pub fn allocations(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.iter().filter(|(_, block)| block.is_allocated())
    }
}

impl<'a> IntoIterator for &'a BuddyAllocator {
    type Item = (BlockId, &'a Block);
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
