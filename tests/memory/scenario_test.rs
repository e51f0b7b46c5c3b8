/*!
 * Buddy Scenario Tests
 * Fixed allocate/release sequences on a 1024 unit pool with 64 unit blocks
 */

use buddy_system::memory::{BlockKind, BuddyAllocator, MemoryError};
use pretty_assertions::assert_eq;

fn pool() -> BuddyAllocator {
    BuddyAllocator::new(1024, 64)
}

/// (size, kind, owner) for every block in pre-order
fn shape(alloc: &BuddyAllocator) -> Vec<(usize, BlockKind, Option<u32>)> {
    alloc
        .iter()
        .map(|(_, b)| (b.size(), b.kind(), b.owner()))
        .collect()
}

#[test]
fn test_allocate_rounds_up_to_power_of_two() {
    let mut alloc = pool();
    let allocation = alloc.allocate(1, 100).expect("allocation should fit");

    assert_eq!(allocation.block_size, 128);
    assert_eq!(alloc.used_memory(), 128);
    assert_eq!(alloc.free_memory(), 896);
    assert_eq!(alloc.usage_percent(), 12.5);

    let owned: Vec<_> = alloc
        .allocations()
        .map(|(_, b)| (b.owner(), b.size()))
        .collect();
    assert_eq!(owned, vec![(Some(1), 128)]);
}

#[test]
fn test_large_request_after_split_has_no_fit() {
    let mut alloc = pool();
    alloc.allocate(1, 100).unwrap();

    assert_eq!(
        alloc.allocate(2, 900),
        Err(MemoryError::NoFit { requested: 900 })
    );
    assert_eq!(alloc.used_memory(), 128);
    assert_eq!(alloc.process_memory(2), 0);
}

#[test]
fn test_buddies_coalesce_only_when_both_free() {
    let mut alloc = pool();
    let first = alloc.allocate(1, 64).unwrap();
    let second = alloc.allocate(2, 64).unwrap();
    assert_eq!((first.offset, second.offset), (0, 64));

    alloc.release(1).unwrap();
    assert_eq!(
        shape(&alloc),
        vec![
            (1024, BlockKind::Split, None),
            (512, BlockKind::Split, None),
            (256, BlockKind::Split, None),
            (128, BlockKind::Split, None),
            (64, BlockKind::Free, None),
            (64, BlockKind::Allocated, Some(2)),
            (128, BlockKind::Free, None),
            (256, BlockKind::Free, None),
            (512, BlockKind::Free, None),
        ]
    );

    // everything else is free, so the merge cascades to the root
    alloc.release(2).unwrap();
    assert_eq!(shape(&alloc), vec![(1024, BlockKind::Free, None)]);
}

#[test]
fn test_cascade_stops_below_allocated_buddy() {
    let mut alloc = pool();
    alloc.allocate(1, 64).unwrap();
    alloc.allocate(2, 64).unwrap();
    alloc.allocate(3, 512).unwrap();

    alloc.release(1).unwrap();
    alloc.release(2).unwrap();
    assert_eq!(
        shape(&alloc),
        vec![
            (1024, BlockKind::Split, None),
            (512, BlockKind::Free, None),
            (512, BlockKind::Allocated, Some(3)),
        ]
    );
}

#[test]
fn test_request_larger_than_pool() {
    let mut alloc = pool();
    assert_eq!(
        alloc.allocate(1, 2000),
        Err(MemoryError::SizeExceedsPool {
            requested: 2000,
            pool: 1024
        })
    );
    assert_eq!(shape(&alloc), vec![(1024, BlockKind::Free, None)]);
}

#[test]
fn test_preorder_visits_left_subtree_first() {
    let mut alloc = BuddyAllocator::new(256, 64);
    alloc.allocate(1, 64).unwrap();

    assert_eq!(
        shape(&alloc),
        vec![
            (256, BlockKind::Split, None),
            (128, BlockKind::Split, None),
            (64, BlockKind::Allocated, Some(1)),
            (64, BlockKind::Free, None),
            (128, BlockKind::Free, None),
        ]
    );
}

#[test]
fn test_round_trip_restores_single_root() {
    for size in [1, 64, 65, 100, 300, 512, 1024] {
        let mut alloc = pool();
        alloc.allocate(7, size).unwrap();
        assert_eq!(alloc.release(7), alloc.block_size_for(size));

        assert_eq!(alloc.used_memory(), 0);
        assert!(alloc.root().is_leaf());
        assert!(alloc.root().is_free());
    }
}

#[test]
fn test_pool_fills_with_min_blocks() {
    let mut alloc = pool();
    for pid in 1..=16 {
        let allocation = alloc.allocate(pid, 64).unwrap();
        assert_eq!(allocation.offset, (pid as usize - 1) * 64);
    }

    assert_eq!(alloc.free_memory(), 0);
    assert_eq!(alloc.usage_percent(), 100.0);
    assert_eq!(alloc.depth(), 4);
    assert_eq!(alloc.allocate(17, 1), Err(MemoryError::NoFit { requested: 1 }));

    for pid in 1..=16 {
        alloc.release(pid).unwrap();
    }
    assert_eq!(alloc.tree().len(), 1);
}
