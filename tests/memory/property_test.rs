/*!
 * Buddy Property Tests
 * Invariants checked over random allocate/release sequences
 */

use buddy_system::memory::{BlockState, BuddyAllocator, MemoryError};
use proptest::prelude::*;

const MAX_SIZE: usize = 1024;
const MIN_SIZE: usize = 64;

#[derive(Debug, Clone)]
enum Op {
    Allocate { pid: u32, size: usize },
    Release { pid: u32 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..8, 1usize..=1100).prop_map(|(pid, size)| Op::Allocate { pid, size }),
        (1u32..8).prop_map(|pid| Op::Release { pid }),
    ]
}

/// Structural invariants that must hold between operations
fn check_tree(alloc: &BuddyAllocator) -> Result<(), TestCaseError> {
    let max_depth = (MAX_SIZE / MIN_SIZE).trailing_zeros();
    prop_assert!(alloc.depth() <= max_depth);

    for (_, block) in alloc.iter() {
        prop_assert!(block.size().is_power_of_two());
        prop_assert!(block.size() >= MIN_SIZE && block.size() <= MAX_SIZE);
        prop_assert_eq!(block.offset() % block.size(), 0);

        if let BlockState::Split { left, right } = block.state() {
            let (l, r) = (&alloc.tree()[left], &alloc.tree()[right]);
            prop_assert_eq!(l.size(), block.size() / 2);
            prop_assert_eq!(r.size(), block.size() / 2);
            // no orphan free buddies
            prop_assert!(!(l.is_free() && r.is_free()));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 1..60)) {
        let mut alloc = BuddyAllocator::new(MAX_SIZE, MIN_SIZE);

        for op in ops {
            let used_before = alloc.used_memory();
            match op {
                Op::Allocate { pid, size } => match alloc.allocate(pid, size) {
                    Ok(allocation) => {
                        prop_assert!(allocation.block_size >= size);
                        prop_assert!(allocation.block_size < 2 * size || allocation.block_size == MIN_SIZE);
                        prop_assert_eq!(alloc.used_memory(), used_before + allocation.block_size);
                    }
                    Err(MemoryError::SizeExceedsPool { .. }) => prop_assert!(size > MAX_SIZE),
                    Err(_) => prop_assert_eq!(alloc.used_memory(), used_before),
                },
                Op::Release { pid } => match alloc.release(pid) {
                    Ok(freed) => prop_assert_eq!(alloc.used_memory(), used_before - freed),
                    Err(_) => prop_assert_eq!(alloc.used_memory(), used_before),
                },
            }

            prop_assert_eq!(alloc.used_memory() + alloc.free_memory(), MAX_SIZE);
            prop_assert_eq!(alloc.stats().used_memory, alloc.used_memory());
            check_tree(&alloc)?;
        }
    }

    #[test]
    fn prop_round_trip_on_empty_pool(size in 1usize..=MAX_SIZE) {
        let mut alloc = BuddyAllocator::new(MAX_SIZE, MIN_SIZE);
        let allocation = alloc.allocate(1, size).unwrap();
        prop_assert_eq!(allocation.offset, 0);

        alloc.release(1).unwrap();
        prop_assert_eq!(alloc.used_memory(), 0);
        prop_assert_eq!(alloc.tree().len(), 1);
    }

    #[test]
    fn prop_release_everything_collapses_tree(sizes in prop::collection::vec(1usize..=256, 1..16)) {
        let mut alloc = BuddyAllocator::new(MAX_SIZE, MIN_SIZE);
        let placed: Vec<u32> = sizes
            .iter()
            .enumerate()
            .filter_map(|(i, &size)| alloc.allocate(i as u32 + 1, size).ok().map(|a| a.pid))
            .collect();

        for pid in placed {
            alloc.release(pid).unwrap();
            check_tree(&alloc)?;
        }
        prop_assert!(alloc.root().is_free());
        prop_assert!(alloc.root().is_leaf());
    }
}
