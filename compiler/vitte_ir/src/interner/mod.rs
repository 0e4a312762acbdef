//! General-purpose string interner.
//!
//! Owns its own [`Arena`]; every distinct byte string is stored once and
//! identified by an [`InternedRef`]. Equal inputs always yield equal refs for
//! the lifetime of the interner.

use std::fmt;

use crate::arena::{Arena, ArenaConfig};
use crate::intern::{InternError, InternIndex, InternTable};

/// Handle to an interned byte string.
///
/// Comparing two refs is comparing the strings they stand for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct InternedRef(u32);

impl InternedRef {
    /// Raw 1-based index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl InternIndex for InternedRef {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        InternedRef(raw)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for InternedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedRef({})", self.0)
    }
}

/// Deduplicating byte-string store.
pub struct Interner {
    arena: Arena,
    table: InternTable<InternedRef>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Create an interner whose storage arena uses `config`.
    pub fn with_config(config: ArenaConfig) -> Self {
        Interner {
            arena: Arena::with_config(config),
            table: InternTable::new(),
        }
    }

    /// Intern a byte string.
    pub fn intern(&mut self, bytes: &[u8]) -> Result<InternedRef, InternError> {
        self.table.intern(&mut self.arena, bytes)
    }

    /// Intern a string.
    pub fn intern_str(&mut self, s: &str) -> Result<InternedRef, InternError> {
        self.intern(s.as_bytes())
    }

    /// Look up a byte string without inserting it.
    pub fn get(&self, bytes: &[u8]) -> Option<InternedRef> {
        self.table.get(&self.arena, bytes)
    }

    /// Number of distinct strings.
    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Slot count of the underlying hash table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Bytes of an interned string.
    pub fn resolve(&self, r: InternedRef) -> Option<&[u8]> {
        self.table.resolve(&self.arena, r)
    }

    /// Text of an interned string, if it is valid UTF-8.
    pub fn resolve_str(&self, r: InternedRef) -> Option<&str> {
        self.resolve(r).and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("count", &self.count())
            .field("capacity", &self.capacity())
            .field("reserved_bytes", &self.arena.reserved_bytes())
            .finish()
    }
}
