//! Open-addressing intern table shared by the string interner and the
//! per-unit symbol table.
//!
//! Bytes live in an [`Arena`] owned by the caller; the table only stores
//! `(hash, entry)` slots and the arena handles of each entry. Handles are
//! 1-based so that `0` is never a valid index.
//!
//! - Hash: 64-bit FNV-1a, with `0` remapped to a sentinel (0 marks an empty slot)
//! - Probe: linear from `hash & (capacity - 1)`
//! - Match: same hash, same length, same bytes
//! - Growth: before an insert that would push the load above 70%, the slot
//!   array doubles and every entry is reinserted using its stored hash

use crate::arena::{Arena, ArenaError, ArenaSlice};
use std::fmt;
use std::marker::PhantomData;

/// Initial slot count of a fresh table.
pub const INITIAL_CAPACITY: usize = 64;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stored in place of a zero hash so that zero can mean "empty slot".
const ZERO_HASH_SENTINEL: u64 = 0x9e37_79b9_7f4a_7c15;

/// Load factor limit as `LOAD_NUM / LOAD_DEN`.
const LOAD_NUM: usize = 7;
const LOAD_DEN: usize = 10;

/// Error when interning fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// The backing arena could not store the bytes.
    #[error("intern storage exhausted: {0}")]
    Arena(#[from] ArenaError),
    /// The slot array could not grow.
    #[error("intern table could not grow past {capacity} slots")]
    TableFull { capacity: usize },
    /// More entries than a `u32` handle can address.
    #[error("intern table holds {count} entries, max is {max}", max = u32::MAX)]
    TooManyEntries { count: usize },
}

/// A typed, 1-based handle produced by an [`InternTable`].
pub trait InternIndex: Copy {
    /// Build a handle from a 1-based entry number.
    fn from_raw(raw: u32) -> Self;

    /// The 1-based entry number.
    fn raw(self) -> u32;
}

/// 64-bit FNV-1a over `bytes`, never returning zero.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    if hash == 0 {
        ZERO_HASH_SENTINEL
    } else {
        hash
    }
}

#[derive(Copy, Clone, Default)]
struct Slot {
    /// `0` when the slot is empty.
    hash: u64,
    /// 1-based entry number.
    entry: u32,
}

#[derive(Copy, Clone)]
struct Entry {
    hash: u64,
    bytes: ArenaSlice,
}

/// Deduplicating byte-string table keyed by `I`.
pub struct InternTable<I> {
    slots: Vec<Slot>,
    entries: Vec<Entry>,
    _index: PhantomData<I>,
}

impl<I: InternIndex> Default for InternTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InternIndex> InternTable<I> {
    /// Create a table with [`INITIAL_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a table with at least `capacity` slots (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        InternTable {
            slots: vec![Slot::default(); capacity],
            entries: Vec::new(),
            _index: PhantomData,
        }
    }

    /// Number of distinct entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Intern `bytes`, copying them into `arena` on first sight.
    pub fn intern(&mut self, arena: &mut Arena, bytes: &[u8]) -> Result<I, InternError> {
        let hash = hash_bytes(bytes);
        let empty = match self.probe(arena, hash, bytes) {
            Ok(found) => return Ok(I::from_raw(found)),
            Err(empty) => empty,
        };

        let count = self.entries.len() + 1;
        let raw = u32::try_from(count).map_err(|_| InternError::TooManyEntries { count })?;

        let slot = if count * LOAD_DEN > self.slots.len() * LOAD_NUM {
            self.grow()?;
            match self.probe(arena, hash, bytes) {
                Ok(found) => return Ok(I::from_raw(found)),
                Err(empty) => empty,
            }
        } else {
            empty
        };

        let stored = arena.alloc_bytes(bytes)?;
        self.entries.push(Entry {
            hash,
            bytes: stored,
        });
        self.slots[slot] = Slot { hash, entry: raw };
        Ok(I::from_raw(raw))
    }

    /// Look up `bytes` without inserting.
    pub fn get(&self, arena: &Arena, bytes: &[u8]) -> Option<I> {
        self.probe(arena, hash_bytes(bytes), bytes)
            .ok()
            .map(I::from_raw)
    }

    /// The bytes behind `index`, or `None` for an index this table never issued.
    pub fn resolve<'a>(&self, arena: &'a Arena, index: I) -> Option<&'a [u8]> {
        let position = usize::try_from(index.raw()).ok()?.checked_sub(1)?;
        let entry = self.entries.get(position)?;
        arena.get(entry.bytes)
    }

    /// Drop every entry, keeping the current slot count.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::default());
        self.entries.clear();
    }

    /// Find `bytes`: `Ok(entry)` on a hit, `Err(slot)` with the first empty
    /// slot on the probe chain otherwise.
    fn probe(&self, arena: &Arena, hash: u64, bytes: &[u8]) -> Result<u32, usize> {
        let mask = self.slots.len() - 1;
        let mut index = slot_for(hash, mask);
        loop {
            let slot = self.slots[index];
            if slot.hash == 0 {
                return Err(index);
            }
            if slot.hash == hash && self.entry_matches(arena, slot.entry, bytes) {
                return Ok(slot.entry);
            }
            index = (index + 1) & mask;
        }
    }

    fn entry_matches(&self, arena: &Arena, entry: u32, bytes: &[u8]) -> bool {
        let Some(entry) = (entry as usize)
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
        else {
            return false;
        };
        entry.bytes.len() == bytes.len() && arena.get(entry.bytes) == Some(bytes)
    }

    fn grow(&mut self) -> Result<(), InternError> {
        let capacity = self.slots.len();
        let new_capacity = capacity
            .checked_mul(2)
            .ok_or(InternError::TableFull { capacity })?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(new_capacity)
            .map_err(|_| InternError::TableFull { capacity })?;
        slots.resize(new_capacity, Slot::default());

        let mask = new_capacity - 1;
        for (position, entry) in self.entries.iter().enumerate() {
            let mut index = slot_for(entry.hash, mask);
            while slots[index].hash != 0 {
                index = (index + 1) & mask;
            }
            // position < entries.len(), which already fit in u32 when inserted
            #[expect(
                clippy::cast_possible_truncation,
                reason = "entry count is bounded by u32 at insertion"
            )]
            let raw = position as u32 + 1;
            slots[index] = Slot {
                hash: entry.hash,
                entry: raw,
            };
        }

        tracing::trace!(
            from = capacity,
            to = new_capacity,
            entries = self.entries.len(),
            "intern table rehash"
        );
        self.slots = slots;
        Ok(())
    }
}

impl<I> fmt::Debug for InternTable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternTable")
            .field("len", &self.entries.len())
            .field("capacity", &self.slots.len())
            .finish()
    }
}

#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "masked to the slot count before use"
)]
fn slot_for(hash: u64, mask: usize) -> usize {
    (hash as usize) & mask
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
