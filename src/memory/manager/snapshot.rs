/*!
 * Buddy Snapshot
 * Serializable tree view and text rendering for external front ends
 */

use super::super::tree::{BlockId, BlockKind, BlockState};
use super::BuddyAllocator;
use crate::core::types::{Address, Pid, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owned copy of a block and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub size: Size,
    pub offset: Address,
    pub state: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Pid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockSnapshot>,
}

impl BlockSnapshot {
    /// Number of blocks in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BlockSnapshot::count).sum::<usize>()
    }
}

impl BuddyAllocator {
    pub fn snapshot(&self) -> BlockSnapshot {
        self.snapshot_of(self.tree.root())
    }

    /// Pretty-printed JSON of [`BuddyAllocator::snapshot`]
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }

    fn snapshot_of(&self, id: BlockId) -> BlockSnapshot {
        let block = &self.tree[id];
        let children = match block.children() {
            Some((left, right)) => vec![self.snapshot_of(left), self.snapshot_of(right)],
            None => Vec::new(),
        };
        BlockSnapshot {
            size: block.size(),
            offset: block.offset(),
            state: block.kind(),
            owner: block.owner(),
            children,
        }
    }

    fn fmt_block(&self, f: &mut fmt::Formatter<'_>, id: BlockId, level: usize) -> fmt::Result {
        let block = &self.tree[id];
        let indent = "    ".repeat(level);
        match block.state() {
            BlockState::Split { left, right } => {
                writeln!(f, "{indent}[{} @{} SPLIT]", block.size(), block.offset())?;
                self.fmt_block(f, left, level + 1)?;
                self.fmt_block(f, right, level + 1)
            }
            BlockState::Allocated { pid, .. } => {
                writeln!(f, "{indent}[{} @{} PID={pid}]", block.size(), block.offset())
            }
            BlockState::Free => writeln!(f, "{indent}[{} @{} FREE]", block.size(), block.offset()),
        }
    }
}

/// Indented tree, one block per line
impl fmt::Display for BuddyAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_block(f, self.tree.root(), 0)
    }
}
