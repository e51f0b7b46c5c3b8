/*!
 * Shared Allocator
 *
 * Thread-safe handle around a [`BuddyAllocator`]. Every public operation takes
 * the lock exactly once, so each call observes and leaves a consistent tree.
 */

use super::manager::{BlockSnapshot, BuddyAllocator};
use super::types::{Allocation, MemoryResult, MemoryStats};
use crate::core::types::{Pid, Size};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, lock-protected allocator handle
#[derive(Debug, Clone)]
pub struct SharedAllocator {
    inner: Arc<Mutex<BuddyAllocator>>,
}

impl SharedAllocator {
    pub fn new(allocator: BuddyAllocator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(allocator)),
        }
    }

    pub fn allocate(&self, pid: Pid, size: Size) -> MemoryResult<Allocation> {
        self.inner.lock().allocate(pid, size)
    }

    pub fn release(&self, pid: Pid) -> MemoryResult<Size> {
        self.inner.lock().release(pid)
    }

    pub fn free_process_memory(&self, pid: Pid) -> Size {
        self.inner.lock().free_process_memory(pid)
    }

    pub fn used_memory(&self) -> Size {
        self.inner.lock().used_memory()
    }

    pub fn free_memory(&self) -> Size {
        self.inner.lock().free_memory()
    }

    pub fn usage_percent(&self) -> f64 {
        self.inner.lock().usage_percent()
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.lock().stats()
    }

    pub fn snapshot(&self) -> BlockSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn reset(&self) {
        self.inner.lock().reset()
    }

    /// Run `f` against the allocator while holding the lock
    ///
    /// This is the only way to enumerate blocks through a shared handle, so no
    /// other caller can mutate the tree mid-iteration.
    pub fn with<R>(&self, f: impl FnOnce(&BuddyAllocator) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl From<BuddyAllocator> for SharedAllocator {
    fn from(allocator: BuddyAllocator) -> Self {
        Self::new(allocator)
    }
}
