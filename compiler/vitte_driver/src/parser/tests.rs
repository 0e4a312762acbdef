use super::*;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> (AstTree, Result<NodeIdx, PassError>, DiagnosticBag) {
    let mut ast = AstTree::new();
    let mut bag = DiagnosticBag::new();
    let input = ParseInput {
        source: source.as_bytes(),
        file_id: 1,
    };
    let result = StructureParser::new().parse(input, &mut ast, &mut bag);
    (ast, result, bag)
}

fn kinds(ast: &AstTree, idx: NodeIdx) -> Vec<NodeKind> {
    ast.node(idx)
        .unwrap()
        .children()
        .iter()
        .map(|&c| ast.node(c).unwrap().kind())
        .collect()
}

#[test]
fn test_block_with_phrases() {
    let src = "fn main()\n  say \"hi\"\n  set x = 1\n.end\n";
    let (ast, result, bag) = parse(src);
    let root = result.unwrap();
    assert!(bag.is_empty());
    assert_eq!(ast.roots(), &[root]);
    assert_eq!(ast.node(root).unwrap().span(), Span::new(1, 0, 38));

    let children = ast.node(root).unwrap().children().to_vec();
    assert_eq!(children.len(), 1);
    let block = ast.node(children[0]).unwrap();
    assert_eq!(block.kind(), NodeKind::Block);
    assert_eq!(ast.text(children[0]), Some("fn"));
    assert_eq!(block.aux_text(), Some("main"));
    // Through the `.end` at 33.
    assert_eq!(block.span(), Span::new(1, 0, 37));
    assert_eq!(
        kinds(&ast, children[0]),
        vec![
            NodeKind::Token,
            NodeKind::Group,
            NodeKind::Phrase,
            NodeKind::Phrase
        ]
    );

    let say = block.children()[2];
    assert_eq!(ast.text(say), Some("say"));
    assert_eq!(ast.node(say).unwrap().span(), Span::new(1, 12, 20));
}

#[test]
fn test_brace_header_is_not_a_block() {
    let (ast, result, bag) = parse("fn main() { say 1 + 1 }");
    let root = result.unwrap();
    assert!(bag.is_empty());
    assert_eq!(
        kinds(&ast, root),
        vec![
            NodeKind::Token,
            NodeKind::Token,
            NodeKind::Group,
            NodeKind::Group
        ]
    );
    let body = ast.node(root).unwrap().children()[3];
    assert_eq!(ast.node(body).unwrap().span(), Span::new(1, 10, 23));
    assert_eq!(kinds(&ast, body), vec![NodeKind::Phrase]);
}

#[test]
fn test_semicolon_ends_phrase() {
    let (ast, result, _) = parse("say 1; say 2");
    let root = result.unwrap();
    let children = ast.node(root).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(ast.node(children[0]).unwrap().span(), Span::new(1, 0, 6));
    assert_eq!(kinds(&ast, children[0]), vec![NodeKind::Token, NodeKind::Token]);
}

#[test]
fn test_nested_blocks() {
    let src = "prog demo\n  loop\n    say 1\n  .end\n.end\n";
    let (ast, result, bag) = parse(src);
    let root = result.unwrap();
    assert!(bag.is_empty());
    let prog = ast.node(root).unwrap().children()[0];
    assert_eq!(ast.node(prog).unwrap().aux_text(), Some("demo"));
    assert_eq!(kinds(&ast, prog), vec![NodeKind::Token, NodeKind::Block]);
    assert_eq!(ast.count_nodes(root).unwrap(), ast.live_count());
}

#[test]
fn test_stray_end() {
    let (_, result, bag) = parse("say \"hi\"\n.end\n");
    assert!(matches!(result, Err(PassError::Reported)));
    assert_eq!(bag.len(), 1);
    let diag = bag.get(0).unwrap();
    assert_eq!(diag.code, DiagCode::E0203);
    assert_eq!(diag.primary_span(), Span::new(1, 9, 13));
    assert_eq!(diag.primary().message.as_deref(), Some("nothing to close"));
}

#[test]
fn test_unclosed_block() {
    let (_, result, bag) = parse("fn main()\n  say 1\n");
    assert!(result.is_err());
    let diag = bag.get(0).unwrap();
    assert_eq!(diag.code, DiagCode::E0208);
    assert_eq!(diag.message, "expected block terminator");
    assert_eq!(diag.primary_span(), Span::new(1, 0, 2));
    assert_eq!(diag.help(), Some("close the block with `.end`"));
}

#[test]
fn test_mismatched_delimiter_points_at_opener() {
    let (_, result, bag) = parse("say f(1]\n");
    assert!(result.is_err());
    let diag = bag.get(0).unwrap();
    assert_eq!(diag.code, DiagCode::E0209);
    assert_eq!(diag.primary_span(), Span::new(1, 7, 8));
    assert_eq!(diag.labels().len(), 2);
    assert_eq!(diag.labels()[1].span, Span::new(1, 5, 6));
}

#[test]
fn test_unexpected_and_unclosed_delimiters() {
    let (_, _, bag) = parse(")");
    assert_eq!(bag.get(0).unwrap().message, "unexpected closing delimiter `)`");

    let (_, _, bag) = parse("say [1,\n 2\n");
    let diag = bag.get(0).unwrap();
    assert_eq!(diag.message, "unclosed delimiter `[`");
    assert_eq!(diag.primary_span(), Span::new(1, 4, 5));
}

#[test]
fn test_end_inside_group() {
    let (_, _, bag) = parse("fn f()\n  say (1\n.end\n");
    let diag = bag.get(0).unwrap();
    assert_eq!(diag.code, DiagCode::E0203);
    assert_eq!(diag.labels()[1].span, Span::new(1, 13, 14));
}

#[test]
fn test_lex_error_is_reported() {
    let (ast, result, bag) = parse("say @");
    assert!(matches!(result, Err(PassError::Reported)));
    assert_eq!(bag.get(0).unwrap().code, DiagCode::E0101);
    assert_eq!(ast.live_count(), 0);
}

#[test]
fn test_empty_source() {
    let (ast, result, bag) = parse("");
    let root = result.unwrap();
    assert!(bag.is_empty());
    assert_eq!(ast.child_count(root).unwrap(), 0);
}
