/*!
 * Pid Ownership Tests
 * Documents how repeated allocations for the same pid behave
 */

use buddy_system::memory::{BuddyAllocator, MemoryError};
use pretty_assertions::assert_eq;

#[test]
fn test_same_pid_can_hold_several_blocks() {
    let mut alloc = BuddyAllocator::new(1024, 64);
    let first = alloc.allocate(1, 100).unwrap();
    let second = alloc.allocate(1, 100).unwrap();

    assert_ne!(first.offset, second.offset);
    assert_eq!(alloc.process_memory(1), 256);
    assert_eq!(alloc.allocations().count(), 2);
}

#[test]
fn test_release_frees_first_preorder_match_only() {
    let mut alloc = BuddyAllocator::new(1024, 64);
    alloc.allocate(1, 512).unwrap();
    alloc.allocate(1, 64).unwrap();

    // the 512 block at offset 0 comes first in pre-order
    assert_eq!(alloc.release(1), Ok(512));
    let remaining: Vec<_> = alloc
        .allocations()
        .map(|(_, b)| (b.owner(), b.size(), b.offset()))
        .collect();
    assert_eq!(remaining, vec![(Some(1), 64, 512)]);

    assert_eq!(alloc.release(1), Ok(64));
    assert_eq!(alloc.release(1), Err(MemoryError::NotFound(1)));
    assert!(alloc.root().is_free());
}

#[test]
fn test_free_process_memory_reaches_every_block() {
    let mut alloc = BuddyAllocator::new(1024, 64);
    alloc.allocate(4, 64).unwrap();
    alloc.allocate(5, 64).unwrap();
    alloc.allocate(4, 256).unwrap();
    alloc.allocate(4, 64).unwrap();

    assert_eq!(alloc.free_process_memory(4), 64 + 256 + 64);
    assert_eq!(alloc.process_memory(4), 0);
    assert_eq!(alloc.used_memory(), 64);
    assert_eq!(alloc.find_block(4), None);
    assert!(alloc.find_block(5).is_some());
}

#[test]
fn test_failed_release_changes_nothing() {
    let mut alloc = BuddyAllocator::new(1024, 64);
    alloc.allocate(1, 300).unwrap();
    let before = alloc.snapshot();

    assert_eq!(alloc.release(99), Err(MemoryError::NotFound(99)));
    assert_eq!(alloc.snapshot(), before);
    assert_eq!(alloc.used_memory() + alloc.free_memory(), 1024);
}
