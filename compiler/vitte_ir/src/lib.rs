//! Vitte IR - front-end storage and identity types
//!
//! This crate contains the data structures every later compiler stage
//! builds on:
//! - [`Arena`]: bump allocation with mark/rewind
//! - [`Interner`]: deduplicated byte strings behind [`InternedRef`]
//! - [`AstIds`]: node ids and per-unit [`Symbol`]s
//! - [`AstTree`]: index-based AST with checked parent/child relations
//! - [`Span`]: source locations
//!
//! # Design Philosophy
//!
//! - **Handles, not pointers**: arena bytes, interned strings, symbols and
//!   nodes are all addressed by small copyable indices.
//! - **Fallible allocation**: every operation that can grow storage returns
//!   `Result` so callers turn exhaustion into a diagnostic.
//! - **One compilation unit, one owner**: none of these types are shared
//!   across threads.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod arena;
pub mod ast;
mod ast_ids;
pub mod intern;
mod interner;
mod span;

pub use arena::{Arena, ArenaConfig, ArenaError, ArenaSlice, Mark};
pub use ast::{AstTree, NodeData, NodeIdx, NodeKind, Owner, TreeError};
pub use ast_ids::{AstIds, IdError, NodeId, Symbol};
pub use intern::{InternError, InternIndex, InternTable};
pub use interner::{InternedRef, Interner};
pub use span::{Span, SpanError};
