//! Lowering seam and the skeleton HIR/IR.
//!
//! The skeleton keeps only what the structure parser recovers: which blocks
//! and phrases exist, where, and how they nest.

use vitte_diagnostic::{DiagCode, Diagnostic, DiagnosticBag};
use vitte_ir::{AstTree, NodeIdx, NodeKind, Span};

use crate::pipeline::PassError;

/// Builds and checks the lowered forms of one unit.
///
/// Any `Err(PassError::Reported)` comes with at least one error in
/// `diagnostics`.
pub trait Lowering {
    type Hir;
    type Ir;

    fn build_hir(
        &mut self,
        ast: &AstTree,
        root: NodeIdx,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<Self::Hir, PassError>;

    fn build_ir(&mut self, hir: &Self::Hir, diagnostics: &mut DiagnosticBag) -> Result<Self::Ir, PassError>;

    fn validate_ir(&mut self, ir: &Self::Ir, diagnostics: &mut DiagnosticBag) -> Result<(), PassError>;
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum HirItemKind {
    Block,
    Phrase,
}

/// A block or phrase, in source order.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct HirItem {
    pub kind: HirItemKind,
    pub keyword: String,
    /// Name following a block keyword.
    pub name: Option<String>,
    pub span: Span,
    /// Number of enclosing blocks.
    pub depth: u32,
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct SkeletonHir {
    pub items: Vec<HirItem>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum IrOp {
    Enter { keyword: String, span: Span },
    Stmt { keyword: String, span: Span },
    Exit,
}

/// Flat op list; every `Enter` has a matching `Exit`.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct SkeletonIr {
    pub ops: Vec<IrOp>,
}

/// Lowering for [`StructureParser`](crate::StructureParser) trees.
#[derive(Copy, Clone, Debug, Default)]
pub struct SkeletonLowering;

impl SkeletonLowering {
    pub fn new() -> Self {
        SkeletonLowering
    }
}

impl Lowering for SkeletonLowering {
    type Hir = SkeletonHir;
    type Ir = SkeletonIr;

    fn build_hir(
        &mut self,
        ast: &AstTree,
        root: NodeIdx,
        _diagnostics: &mut DiagnosticBag,
    ) -> Result<SkeletonHir, PassError> {
        let mut items = Vec::new();
        let mut stack = vec![(root, 0u32)];
        while let Some((idx, depth)) = stack.pop() {
            let node = ast.node(idx)?;
            let kind = match node.kind() {
                NodeKind::Block => Some(HirItemKind::Block),
                NodeKind::Phrase => Some(HirItemKind::Phrase),
                NodeKind::Module | NodeKind::Group | NodeKind::Token => None,
            };
            if let Some(kind) = kind {
                items.push(HirItem {
                    kind,
                    keyword: ast.text(idx).unwrap_or_default().to_owned(),
                    name: node.aux_text().map(str::to_owned),
                    span: node.span(),
                    depth,
                });
            }
            let child_depth = if kind == Some(HirItemKind::Block) {
                depth + 1
            } else {
                depth
            };
            stack.extend(node.children().iter().rev().map(|&c| (c, child_depth)));
        }
        tracing::debug!(items = items.len(), "built skeleton HIR");
        Ok(SkeletonHir { items })
    }

    fn build_ir(
        &mut self,
        hir: &SkeletonHir,
        _diagnostics: &mut DiagnosticBag,
    ) -> Result<SkeletonIr, PassError> {
        let mut ops = Vec::with_capacity(hir.items.len());
        let mut open = 0u32;
        for item in &hir.items {
            while open > item.depth {
                ops.push(IrOp::Exit);
                open -= 1;
            }
            match item.kind {
                HirItemKind::Block => {
                    ops.push(IrOp::Enter {
                        keyword: item.keyword.clone(),
                        span: item.span,
                    });
                    open += 1;
                }
                HirItemKind::Phrase => ops.push(IrOp::Stmt {
                    keyword: item.keyword.clone(),
                    span: item.span,
                }),
            }
        }
        ops.extend((0..open).map(|_| IrOp::Exit));
        Ok(SkeletonIr { ops })
    }

    fn validate_ir(&mut self, ir: &SkeletonIr, diagnostics: &mut DiagnosticBag) -> Result<(), PassError> {
        match check_ops(&ir.ops) {
            Ok(()) => Ok(()),
            Err((span, note)) => {
                diagnostics.push(Diagnostic::from_code(DiagCode::E0501, span).with_note(note));
                Err(PassError::Reported)
            }
        }
    }
}

fn check_ops(ops: &[IrOp]) -> Result<(), (Span, String)> {
    let mut depth = 0usize;
    for (index, op) in ops.iter().enumerate() {
        match op {
            IrOp::Enter { span, .. } | IrOp::Stmt { span, .. } if !span.is_valid() => {
                return Err((*span, format!("op {index} has an invalid span")));
            }
            IrOp::Enter { .. } => depth += 1,
            IrOp::Stmt { .. } => {}
            IrOp::Exit if depth == 0 => {
                return Err((Span::DUMMY, format!("op {index} exits with no open block")));
            }
            IrOp::Exit => depth -= 1,
        }
    }
    if depth > 0 {
        return Err((Span::DUMMY, format!("{depth} block(s) never exited")));
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
