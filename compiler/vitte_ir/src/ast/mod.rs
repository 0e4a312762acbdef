//! Index-based AST tree.
//!
//! Nodes live in one flat vector owned by [`AstTree`] and refer to each other
//! through [`NodeIdx`]. A node has at most one owner: a parent node or the
//! tree's root list. Children are an ordered list on the parent, so the
//! sibling relation is position in that list.
//!
//! # Invariants
//!
//! - A node appears in exactly one child list (or the root list), or in none
//!   when detached.
//! - A node is never attached below its own descendant, so the parent relation
//!   is acyclic.
//! - Traversals ([`AstTree::count_nodes`], [`AstTree::free_tree`]) use an
//!   explicit work list and never recurse.

use std::fmt;

use smallvec::SmallVec;

use crate::arena::ArenaConfig;
use crate::ast_ids::{AstIds, IdError, NodeId, Symbol};
use crate::Span;

/// Position of a node in its [`AstTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);

impl NodeIdx {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIdx({})", self.0)
    }
}

/// Coarse node classification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Top-level node for one source file.
    Module,
    /// Keyword block (`fn`, `program`, `when`, ...) closed by `.end`.
    Block,
    /// `set`/`say`/`do`/`ret` phrase, ended by a newline or `;`.
    Phrase,
    /// Bracketed group: `( ... )`, `[ ... ]` or `{ ... }`.
    Group,
    /// A single token kept as a leaf.
    Token,
}

/// Who owns a node.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Owner {
    /// Not reachable from any root.
    Detached,
    /// Member of the tree's root list.
    Root,
    /// Child of the given node.
    Parent(NodeIdx),
}

/// Misuse of the tree API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("{0:?} does not belong to this tree")]
    Unknown(NodeIdx),
    #[error("{0:?} has been freed")]
    Freed(NodeIdx),
    #[error("{0:?} is already attached; detach it first")]
    AlreadyAttached(NodeIdx),
    #[error("{0:?} is detached and has no sibling list")]
    Detached(NodeIdx),
    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    WouldCycle { parent: NodeIdx, child: NodeIdx },
    #[error("tree holds more than u32::MAX nodes")]
    TooManyNodes,
    #[error(transparent)]
    Id(#[from] IdError),
}

/// One node record.
#[derive(Clone, Debug)]
pub struct NodeData {
    id: NodeId,
    kind: NodeKind,
    span: Span,
    text: Option<Symbol>,
    aux_text: Option<Box<str>>,
    owner: Owner,
    children: SmallVec<[NodeIdx; 4]>,
    alive: bool,
}

impl NodeData {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Interned primary text (identifier, literal, keyword).
    #[inline]
    pub fn text(&self) -> Option<Symbol> {
        self.text
    }

    /// Secondary text owned by the node itself.
    #[inline]
    pub fn aux_text(&self) -> Option<&str> {
        self.aux_text.as_deref()
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    #[inline]
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }
}

/// AST storage for one compilation unit.
#[derive(Debug)]
pub struct AstTree {
    nodes: Vec<NodeData>,
    roots: Vec<NodeIdx>,
    ids: AstIds,
    live: usize,
}

impl Default for AstTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AstTree {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Create a tree whose symbol storage uses `config`.
    pub fn with_config(config: ArenaConfig) -> Self {
        AstTree {
            nodes: Vec::new(),
            roots: Vec::new(),
            ids: AstIds::with_config(config),
            live: 0,
        }
    }

    /// Create a detached node with a fresh [`NodeId`].
    pub fn new_node(&mut self, kind: NodeKind, span: Span) -> Result<NodeIdx, TreeError> {
        let idx = NodeIdx(u32::try_from(self.nodes.len()).map_err(|_| TreeError::TooManyNodes)?);
        let id = self.ids.next_id()?;
        self.nodes.push(NodeData {
            id,
            kind,
            span,
            text: None,
            aux_text: None,
            owner: Owner::Detached,
            children: SmallVec::new(),
            alive: true,
        });
        self.live += 1;
        Ok(idx)
    }

    /// Node record, or `None` if unknown or freed.
    pub fn get(&self, idx: NodeIdx) -> Option<&NodeData> {
        self.nodes.get(idx.index()).filter(|n| n.alive)
    }

    /// Node record, or the reason it is unavailable.
    pub fn node(&self, idx: NodeIdx) -> Result<&NodeData, TreeError> {
        match self.nodes.get(idx.index()) {
            Some(node) if node.alive => Ok(node),
            Some(_) => Err(TreeError::Freed(idx)),
            None => Err(TreeError::Unknown(idx)),
        }
    }

    fn node_mut(&mut self, idx: NodeIdx) -> Result<&mut NodeData, TreeError> {
        match self.nodes.get_mut(idx.index()) {
            Some(node) if node.alive => Ok(node),
            Some(_) => Err(TreeError::Freed(idx)),
            None => Err(TreeError::Unknown(idx)),
        }
    }

    /// Set the node's primary text, interning it in the unit's symbol table.
    pub fn set_text(&mut self, idx: NodeIdx, text: &str) -> Result<Symbol, TreeError> {
        self.node(idx)?;
        let symbol = self.ids.intern_symbol(text)?;
        self.node_mut(idx)?.text = Some(symbol);
        Ok(symbol)
    }

    /// Set the node's owned secondary text.
    pub fn set_aux_text(&mut self, idx: NodeIdx, text: impl Into<Box<str>>) -> Result<(), TreeError> {
        self.node_mut(idx)?.aux_text = Some(text.into());
        Ok(())
    }

    /// Resolved primary text of a node.
    pub fn text(&self, idx: NodeIdx) -> Option<&str> {
        let symbol = self.get(idx)?.text?;
        self.ids.symbol_text(symbol)
    }

    pub fn set_span(&mut self, idx: NodeIdx, span: Span) -> Result<(), TreeError> {
        self.node_mut(idx)?.span = span;
        Ok(())
    }

    /// Make a detached node a top-level root.
    pub fn push_root(&mut self, idx: NodeIdx) -> Result<(), TreeError> {
        let node = self.node_mut(idx)?;
        if node.owner != Owner::Detached {
            return Err(TreeError::AlreadyAttached(idx));
        }
        node.owner = Owner::Root;
        self.roots.push(idx);
        Ok(())
    }

    /// Top-level nodes in insertion order.
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// `child` must be detached, and `parent` must not lie inside `child`'s
    /// subtree.
    pub fn append_child(&mut self, parent: NodeIdx, child: NodeIdx) -> Result<(), TreeError> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if child_node.owner != Owner::Detached {
            return Err(TreeError::AlreadyAttached(child));
        }
        // A leaf can only be its own ancestor, so only walk up for subtrees.
        if child == parent || (!child_node.children.is_empty() && self.is_ancestor(child, parent)) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        self.node_mut(child)?.owner = Owner::Parent(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Append `sib` after the last sibling of `node`.
    ///
    /// The sibling list is the child list of `node`'s parent, or the root list
    /// when `node` is a root.
    pub fn append_sibling(&mut self, node: NodeIdx, sib: NodeIdx) -> Result<(), TreeError> {
        match self.node(node)?.owner {
            Owner::Parent(parent) => self.append_child(parent, sib),
            Owner::Root => self.push_root(sib),
            Owner::Detached => Err(TreeError::Detached(node)),
        }
    }

    /// Remove `idx` from its parent's child list (or the root list).
    ///
    /// The node keeps its own subtree.
    pub fn detach(&mut self, idx: NodeIdx) -> Result<(), TreeError> {
        let owner = self.node(idx)?.owner;
        match owner {
            Owner::Detached => return Ok(()),
            Owner::Root => self.roots.retain(|&r| r != idx),
            Owner::Parent(parent) => self.node_mut(parent)?.children.retain(|c| *c != idx),
        }
        self.node_mut(idx)?.owner = Owner::Detached;
        Ok(())
    }

    /// Number of direct children.
    pub fn child_count(&self, idx: NodeIdx) -> Result<usize, TreeError> {
        Ok(self.node(idx)?.children.len())
    }

    /// Sibling following `idx` in its owner's list.
    pub fn next_sibling(&self, idx: NodeIdx) -> Option<NodeIdx> {
        let list = match self.get(idx)?.owner {
            Owner::Parent(parent) => self.get(parent)?.children.as_slice(),
            Owner::Root => self.roots.as_slice(),
            Owner::Detached => return None,
        };
        let position = list.iter().position(|&n| n == idx)?;
        list.get(position + 1).copied()
    }

    /// Number of live nodes in the subtree rooted at `idx`, including `idx`.
    pub fn count_nodes(&self, idx: NodeIdx) -> Result<usize, TreeError> {
        self.node(idx)?;
        let mut count = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            count += 1;
            stack.extend(node.children.iter().copied());
        }
        Ok(count)
    }

    /// Total live nodes across all roots.
    pub fn count_all(&self) -> usize {
        self.roots
            .iter()
            .map(|&r| self.count_nodes(r).unwrap_or(0))
            .sum()
    }

    /// Number of nodes created and not yet freed (attached or not).
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Detach `idx` and release it with its whole subtree.
    ///
    /// Returns how many nodes were released. Freed indices are never reused;
    /// later access reports [`TreeError::Freed`].
    pub fn free_tree(&mut self, idx: NodeIdx) -> Result<usize, TreeError> {
        self.detach(idx)?;
        let mut released = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.index()) else {
                continue;
            };
            if !node.alive {
                continue;
            }
            node.alive = false;
            node.owner = Owner::Detached;
            node.text = None;
            node.aux_text = None;
            stack.extend(node.children.drain(..));
            released += 1;
        }
        self.live -= released;
        Ok(released)
    }

    /// Drop every node and restart node ids. Interned symbols are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.live = 0;
        self.ids.reset();
    }

    /// The unit's identity allocator.
    pub fn ids(&self) -> &AstIds {
        &self.ids
    }

    fn is_ancestor(&self, ancestor: NodeIdx, mut idx: NodeIdx) -> bool {
        loop {
            if idx == ancestor {
                return true;
            }
            match self.get(idx).map(NodeData::owner) {
                Some(Owner::Parent(parent)) => idx = parent,
                _ => return false,
            }
        }
    }
}
