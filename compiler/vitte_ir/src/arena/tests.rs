use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn small_arena() -> Arena {
    Arena::with_config(ArenaConfig::with_block_size(256))
}

#[test]
fn test_allocate_bumps_within_block() {
    let mut arena = small_arena();
    let a = arena.allocate(10, 1).unwrap();
    let b = arena.allocate(6, 1).unwrap();
    assert_eq!((a.block(), a.offset()), (0, 0));
    assert_eq!((b.block(), b.offset()), (0, 10));
    assert_eq!(arena.block_count(), 1);
    assert_eq!(arena.allocated_bytes(), 16);
}

#[test]
fn test_allocate_respects_alignment() {
    let mut arena = small_arena();
    arena.allocate(3, 1).unwrap();
    let aligned = arena.allocate(8, 8).unwrap();
    assert_eq!(aligned.offset(), 8);
    let aligned = arena.allocate(1, 16).unwrap();
    assert_eq!(aligned.offset(), 16);
}

#[test]
fn test_non_power_of_two_alignment_is_coerced() {
    let mut arena = small_arena();
    arena.allocate(1, 1).unwrap();
    let slice = arena.allocate(4, 3).unwrap();
    assert_eq!(slice.offset(), std::mem::size_of::<usize>());
    let slice = arena.allocate(4, 0).unwrap();
    assert_eq!(slice.offset() % std::mem::size_of::<usize>(), 0);
}

#[test]
fn test_oversized_request_gets_own_block() {
    let mut arena = small_arena();
    arena.allocate(10, 1).unwrap();
    let big = arena.allocate(1000, 8).unwrap();
    assert_eq!((big.block(), big.offset()), (1, 0));
    assert_eq!(arena.reserved_bytes(), 256 + 1008);

    // Later blocks are still at least the default size.
    let rest = arena.allocate(8, 8);
    assert!(rest.is_ok());
    let next = arena.allocate(500, 1).unwrap();
    assert_eq!(next.block(), 2);
    assert_eq!(arena.reserved_bytes(), 256 + 1008 + 501);
}

#[test]
fn test_rewind_reuses_tail_of_marked_block() {
    let mut arena = small_arena();
    let first = arena.allocate(10, 1).unwrap();
    let mark = arena.mark();
    let big = arena.allocate(1000, 1).unwrap();
    assert_eq!(big.block(), 1);
    assert_eq!(arena.block_count(), 2);

    arena.rewind(mark).unwrap();
    assert_eq!(arena.block_count(), 1);

    let next = arena.allocate(4, 1).unwrap();
    assert_eq!(next.block(), first.block());
    assert_eq!(next.offset(), first.end());
}

#[test]
fn test_mark_rewind_without_allocation_is_idempotent() {
    let mut arena = small_arena();
    arena.allocate(17, 1).unwrap();
    let mark = arena.mark();
    arena.rewind(mark).unwrap();
    arena.rewind(mark).unwrap();
    assert_eq!(arena.mark(), mark);
    assert_eq!(arena.allocated_bytes(), 17);
}

#[test]
fn test_rewind_to_empty_mark_releases_everything() {
    let mut arena = small_arena();
    let mark = arena.mark();
    assert!(mark.is_empty());
    arena.allocate(100, 1).unwrap();
    arena.allocate(1000, 1).unwrap();
    arena.rewind(mark).unwrap();
    assert_eq!(arena.block_count(), 0);
    assert_eq!(arena.reserved_bytes(), 0);
}

#[test]
fn test_stale_mark_is_rejected() {
    let mut arena = small_arena();
    arena.allocate(4, 1).unwrap();
    let early = arena.mark();
    arena.allocate(1000, 1).unwrap();
    let late = arena.mark();
    arena.rewind(early).unwrap();
    assert!(matches!(
        arena.rewind(late),
        Err(ArenaError::StaleMark { block: 1, .. })
    ));
}

#[test]
fn test_stale_handle_is_not_readable() {
    let mut arena = small_arena();
    let mark = arena.mark();
    let slice = arena.alloc_bytes(b"hello").unwrap();
    assert_eq!(arena.get(slice), Some(&b"hello"[..]));
    arena.rewind(mark).unwrap();
    assert_eq!(arena.get(slice), None);
}

#[test]
fn test_stale_handle_stays_unreadable_after_reuse() {
    let mut arena = small_arena();
    let kept = arena.alloc_bytes(b"keep").unwrap();
    let mark = arena.mark();
    let old = arena.alloc_bytes(b"AAAA").unwrap();
    arena.rewind(mark).unwrap();
    let new = arena.alloc_bytes(b"BBBB").unwrap();
    assert_eq!((new.block(), new.offset()), (old.block(), old.offset()));

    assert_eq!(arena.get(old), None);
    assert_eq!(arena.get_mut(old), None);
    assert_eq!(arena.get(new), Some(&b"BBBB"[..]));
    // Bytes below the mark survive the rewind.
    assert_eq!(arena.get(kept), Some(&b"keep"[..]));
}

#[test]
fn test_handle_on_released_block_stays_unreadable_after_regrow() {
    let mut arena = small_arena();
    arena.allocate(10, 1).unwrap();
    let mark = arena.mark();
    let old = arena.alloc_bytes(&[7; 1000]).unwrap();
    assert_eq!(old.block(), 1);
    arena.rewind(mark).unwrap();
    let new = arena.alloc_bytes(&[9; 1000]).unwrap();
    assert_eq!(new.block(), 1);
    assert_eq!(arena.get(old), None);
    assert!(arena.get(new).is_some());
}

#[test]
fn test_handle_after_reset_or_dispose_is_unreadable() {
    let mut arena = small_arena();
    let before_reset = arena.alloc_bytes(b"one").unwrap();
    arena.reset();
    arena.alloc_bytes(b"two").unwrap();
    assert_eq!(arena.get(before_reset), None);

    let before_dispose = arena.alloc_bytes(b"three").unwrap();
    arena.dispose();
    arena.alloc_bytes(b"four-and-more").unwrap();
    assert_eq!(arena.get(before_dispose), None);
}

#[test]
fn test_mark_on_released_block_is_rejected_after_regrow() {
    let mut arena = small_arena();
    arena.allocate(4, 1).unwrap();
    let early = arena.mark();
    arena.allocate(1000, 1).unwrap();
    let late = arena.mark();
    assert_eq!(arena.block_count(), 2);

    arena.rewind(early).unwrap();
    arena.allocate(1000, 1).unwrap();
    assert_eq!(arena.block_count(), 2);
    assert!(matches!(
        arena.rewind(late),
        Err(ArenaError::StaleMark { block: 1, .. })
    ));
    // The rejected rewind left the regrown block alone.
    assert_eq!(arena.block_count(), 2);
}

#[test]
fn test_mark_past_a_rewind_is_rejected_after_regrow() {
    let mut arena = small_arena();
    let outer = arena.mark();
    arena.allocate(8, 1).unwrap();
    let inner = arena.mark();
    arena.allocate(8, 1).unwrap();
    let deep = arena.mark();

    arena.rewind(inner).unwrap();
    arena.allocate(32, 1).unwrap();
    assert!(matches!(
        arena.rewind(deep),
        Err(ArenaError::StaleMark { .. })
    ));

    // Marks at or below the cut stay usable.
    arena.rewind(inner).unwrap();
    arena.rewind(outer).unwrap();
    assert_eq!(arena.block_count(), 0);
}

#[test]
fn test_allocate_zeroed_clears_reused_bytes() {
    let mut arena = small_arena();
    let mark = arena.mark();
    arena.allocate(1, 1).unwrap();
    let mark_inner = arena.mark();
    let dirty = arena.alloc_bytes(&[0xAB; 32]).unwrap();
    arena.rewind(mark_inner).unwrap();
    let clean = arena.allocate_zeroed(32, 1).unwrap();
    assert_eq!(clean.offset(), dirty.offset());
    assert!(arena.get(clean).unwrap().iter().all(|&b| b == 0));
    arena.rewind(mark).unwrap();
}

#[test]
fn test_reset_keeps_first_block() {
    let mut arena = small_arena();
    arena.allocate(200, 1).unwrap();
    arena.allocate(200, 1).unwrap();
    arena.allocate(2000, 1).unwrap();
    assert_eq!(arena.block_count(), 3);
    arena.reset();
    assert_eq!(arena.block_count(), 1);
    assert_eq!(arena.reserved_bytes(), 256);
    assert_eq!(arena.allocated_bytes(), 0);
    let slice = arena.allocate(8, 1).unwrap();
    assert_eq!((slice.block(), slice.offset()), (0, 0));
}

#[test]
fn test_dispose_releases_all() {
    let mut arena = small_arena();
    arena.allocate(10, 1).unwrap();
    arena.dispose();
    assert_eq!(arena.block_count(), 0);
    assert_eq!(arena.mark(), Mark::EMPTY);
}

#[test]
fn test_max_bytes_surfaces_out_of_memory() {
    let mut arena = Arena::with_config(ArenaConfig::with_block_size(64).max_bytes(128));
    arena.allocate(60, 1).unwrap();
    arena.allocate(60, 1).unwrap();
    let err = arena.allocate(60, 1).unwrap_err();
    assert_eq!(
        err,
        ArenaError::OutOfMemory {
            requested: 64,
            reserved: 128
        }
    );
    // A failed allocation leaves the arena usable.
    assert_eq!(arena.block_count(), 2);
    assert!(arena.allocate(2, 1).is_ok());
}

#[test]
fn test_size_overflow() {
    let mut arena = small_arena();
    assert!(matches!(
        arena.allocate(usize::MAX, 8),
        Err(ArenaError::SizeOverflow { .. })
    ));
}

proptest! {
    #[test]
    fn live_allocations_never_overlap(
        requests in proptest::collection::vec((0usize..300, 0u32..5), 1..60)
    ) {
        let mut arena = Arena::with_config(ArenaConfig::with_block_size(512));
        let mut live: Vec<ArenaSlice> = Vec::new();
        for (size, align_pow) in requests {
            let slice = arena.allocate(size, 1 << align_pow).unwrap();
            prop_assert_eq!(slice.offset() % (1 << align_pow), 0);
            for other in live.iter().filter(|o| o.block() == slice.block()) {
                let disjoint = slice.end() <= other.offset() || other.end() <= slice.offset();
                prop_assert!(disjoint || slice.is_empty() || other.is_empty());
            }
            live.push(slice);
        }
    }

    #[test]
    fn rewind_restores_allocation_point(
        before in proptest::collection::vec(1usize..200, 0..10),
        after in proptest::collection::vec(1usize..2000, 0..10),
        tail in 1usize..64,
    ) {
        let mut arena = Arena::with_config(ArenaConfig::with_block_size(512));
        for size in before {
            arena.allocate(size, 1).unwrap();
        }
        let mark = arena.mark();
        let expected = arena.allocate(tail, 1).unwrap();
        arena.rewind(mark).unwrap();

        for size in after {
            arena.allocate(size, 1).unwrap();
        }
        arena.rewind(mark).unwrap();
        let again = arena.allocate(tail, 1).unwrap();
        prop_assert_eq!(
            (again.block(), again.offset(), again.len()),
            (expected.block(), expected.offset(), expected.len())
        );
        prop_assert_eq!(arena.get(expected), None);
    }
}
