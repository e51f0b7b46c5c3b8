/*!
 * Block
 * A single node of the buddy tree
 */

use crate::core::types::{Address, Pid, Size};
use serde::{Deserialize, Serialize};

/// Index of a block inside the tree's slot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub(super) usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a block currently is
///
/// Children exist exactly when the block is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Free,
    Allocated { pid: Pid, requested: Size },
    Split { left: BlockId, right: BlockId },
}

/// Coarse state used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Free,
    Allocated,
    Split,
}

/// Contiguous power-of-two region of the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(super) size: Size,
    pub(super) offset: Address,
    pub(super) state: BlockState,
    /// Only walked upwards when coalescing
    pub(super) parent: Option<BlockId>,
}

impl Block {
    pub(super) fn new(size: Size, offset: Address, parent: Option<BlockId>) -> Self {
        Self {
            size,
            offset,
            state: BlockState::Free,
            parent,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn offset(&self) -> Address {
        self.offset
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn kind(&self) -> BlockKind {
        match self.state {
            BlockState::Free => BlockKind::Free,
            BlockState::Allocated { .. } => BlockKind::Allocated,
            BlockState::Split { .. } => BlockKind::Split,
        }
    }

    /// Owner pid, only meaningful for allocated blocks
    pub fn owner(&self) -> Option<Pid> {
        match self.state {
            BlockState::Allocated { pid, .. } => Some(pid),
            _ => None,
        }
    }

    /// Size the owner asked for, only meaningful for allocated blocks
    pub fn requested(&self) -> Option<Size> {
        match self.state {
            BlockState::Allocated { requested, .. } => Some(requested),
            _ => None,
        }
    }

    /// Unused units inside an allocated block, 0 otherwise
    pub fn internal_fragmentation(&self) -> Size {
        self.requested().map_or(0, |requested| self.size - requested)
    }

    pub fn children(&self) -> Option<(BlockId, BlockId)> {
        match self.state {
            BlockState::Split { left, right } => Some((left, right)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self.state, BlockState::Free)
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        matches!(self.state, BlockState::Allocated { .. })
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.state, BlockState::Split { .. })
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_split()
    }
}
