use super::*;
use pretty_assertions::assert_eq;

use crate::parser::{ParseInput, Parser, StructureParser};

fn lower(source: &str) -> (SkeletonHir, SkeletonIr) {
    let mut ast = AstTree::new();
    let mut bag = DiagnosticBag::new();
    let input = ParseInput {
        source: source.as_bytes(),
        file_id: 1,
    };
    let root = StructureParser::new().parse(input, &mut ast, &mut bag).unwrap();
    let mut lowering = SkeletonLowering::new();
    let hir = lowering.build_hir(&ast, root, &mut bag).unwrap();
    let ir = lowering.build_ir(&hir, &mut bag).unwrap();
    lowering.validate_ir(&ir, &mut bag).unwrap();
    assert!(bag.is_empty());
    (hir, ir)
}

fn keywords(ir: &SkeletonIr) -> Vec<String> {
    ir.ops
        .iter()
        .map(|op| match op {
            IrOp::Enter { keyword, .. } => format!("enter {keyword}"),
            IrOp::Stmt { keyword, .. } => keyword.clone(),
            IrOp::Exit => "exit".to_owned(),
        })
        .collect()
}

#[test]
fn test_hir_items_in_source_order() {
    let (hir, _) = lower("say 0\nfn main()\n  set x = 1\n  loop\n    say x\n  .end\n.end\n");
    let summary: Vec<_> = hir
        .items
        .iter()
        .map(|i| (i.kind, i.keyword.as_str(), i.depth))
        .collect();
    assert_eq!(
        summary,
        vec![
            (HirItemKind::Phrase, "say", 0),
            (HirItemKind::Block, "fn", 0),
            (HirItemKind::Phrase, "set", 1),
            (HirItemKind::Block, "loop", 1),
            (HirItemKind::Phrase, "say", 2),
        ]
    );
    assert_eq!(hir.items[1].name.as_deref(), Some("main"));
    assert_eq!(hir.items[3].name, None);
}

#[test]
fn test_ir_balances_blocks() {
    let (_, ir) = lower("fn a()\n  loop\n    say 1\n  .end\n  ret\n.end\nfn b()\n.end\nsay 2\n");
    assert_eq!(
        keywords(&ir),
        vec![
            "enter fn", "enter loop", "say", "exit", "ret", "exit", "enter fn", "exit", "say",
        ]
    );
}

#[test]
fn test_brace_form_has_no_blocks() {
    let (hir, ir) = lower("fn main() { say 1 + 1 }");
    assert_eq!(hir.items.len(), 1);
    assert_eq!(keywords(&ir), vec!["say"]);
}

#[test]
fn test_validate_rejects_unbalanced_ops() {
    let mut bag = DiagnosticBag::new();
    let ir = SkeletonIr {
        ops: vec![IrOp::Exit],
    };
    let result = SkeletonLowering::new().validate_ir(&ir, &mut bag);
    assert!(matches!(result, Err(PassError::Reported)));
    assert_eq!(bag.get(0).unwrap().code, DiagCode::E0501);
    assert_eq!(bag.get(0).unwrap().notes(), &["op 0 exits with no open block".to_owned()]);

    let ir = SkeletonIr {
        ops: vec![IrOp::Enter {
            keyword: "fn".to_owned(),
            span: Span::new(1, 0, 2),
        }],
    };
    assert!(SkeletonLowering::new().validate_ir(&ir, &mut bag).is_err());
    assert_eq!(bag.error_count(), 2);
}

#[test]
fn test_validate_rejects_invalid_spans() {
    let mut bag = DiagnosticBag::new();
    let ir = SkeletonIr {
        ops: vec![IrOp::Stmt {
            keyword: "say".to_owned(),
            span: Span::new(1, 5, 2),
        }],
    };
    assert!(SkeletonLowering::new().validate_ir(&ir, &mut bag).is_err());
    assert_eq!(bag.get(0).unwrap().primary_span(), Span::new(1, 5, 2));
}

#[test]
fn test_stale_root_is_a_tree_error() {
    let mut ast = AstTree::new();
    let root = ast.new_node(NodeKind::Module, Span::DUMMY).unwrap();
    ast.free_tree(root).unwrap();
    let result = SkeletonLowering::new().build_hir(&ast, root, &mut DiagnosticBag::new());
    assert!(matches!(result, Err(PassError::Tree(_))));
}
