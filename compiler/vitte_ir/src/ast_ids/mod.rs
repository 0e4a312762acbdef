//! AST identity allocator.
//!
//! Two independent sub-allocators for one compilation unit:
//!
//! - a monotonic [`NodeId`] counter (0 is never issued)
//! - a [`Symbol`] table for identifier text, backed by its own arena
//!
//! [`AstIds::reset`] only rewinds the node counter. Symbols survive a reset so
//! re-running passes over the same unit does not duplicate identifier storage.

use std::fmt;

use crate::arena::{Arena, ArenaConfig};
use crate::intern::{InternError, InternIndex, InternTable};

/// Identity of an AST node within a compilation unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Never handed out by the allocator.
    pub const INVALID: NodeId = NodeId(0);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

/// Interned identifier text, local to one compilation unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Reserved; never returned by interning.
    pub const INVALID: Symbol = Symbol(0);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl InternIndex for Symbol {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Failure to issue an identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Every `NodeId` up to `u32::MAX` has been issued since the last reset.
    #[error("node id space exhausted after {issued} ids")]
    Exhausted { issued: u32 },
    #[error(transparent)]
    Intern(#[from] InternError),
}

/// Node-id counter plus per-unit symbol table.
pub struct AstIds {
    /// Next id to hand out; `0` once the counter is exhausted.
    next: u32,
    arena: Arena,
    symbols: InternTable<Symbol>,
}

impl Default for AstIds {
    fn default() -> Self {
        Self::new()
    }
}

impl AstIds {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        AstIds {
            next: 1,
            arena: Arena::with_config(config),
            symbols: InternTable::new(),
        }
    }

    /// Issue the next node id.
    ///
    /// Ids are strictly increasing from 1. After `u32::MAX` has been issued
    /// the allocator refuses further ids until [`AstIds::reset`] instead of
    /// wrapping around onto ids that are still in use.
    pub fn next_id(&mut self) -> Result<NodeId, IdError> {
        if self.next == 0 {
            return Err(IdError::Exhausted { issued: u32::MAX });
        }
        let id = NodeId(self.next);
        self.next = self.next.checked_add(1).unwrap_or(0);
        Ok(id)
    }

    /// Number of ids issued since construction or the last reset.
    pub fn issued(&self) -> u32 {
        if self.next == 0 {
            u32::MAX
        } else {
            self.next - 1
        }
    }

    /// Restart node ids at 1. Interned symbols are kept.
    pub fn reset(&mut self) {
        tracing::debug!(issued = self.issued(), "ast ids reset");
        self.next = 1;
    }

    /// Intern identifier text.
    pub fn intern_symbol(&mut self, text: &str) -> Result<Symbol, IdError> {
        Ok(self.symbols.intern(&mut self.arena, text.as_bytes())?)
    }

    /// Look up a symbol without inserting it.
    pub fn find_symbol(&self, text: &str) -> Option<Symbol> {
        self.symbols.get(&self.arena, text.as_bytes())
    }

    /// Text of a symbol; `None` for [`Symbol::INVALID`] or a foreign symbol.
    pub fn symbol_text(&self, symbol: Symbol) -> Option<&str> {
        self.symbols
            .resolve(&self.arena, symbol)
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of distinct symbols.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    #[cfg(test)]
    fn starting_at(next: u32) -> Self {
        AstIds {
            next,
            ..AstIds::new()
        }
    }
}

impl fmt::Debug for AstIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstIds")
            .field("issued", &self.issued())
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

// Size assertions to prevent accidental regressions
mod size_asserts {
    use super::{NodeId, Symbol};
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(Symbol, 4);
}
