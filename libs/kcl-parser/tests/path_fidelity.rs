use kcl_parser::path::{descendants, NodeRef};
use kcl_parser::{parse_source, path_of, path_of_range, range_of, PathError, Span, Spanned};

const SOURCE: &str = "const part001 = startSketchAt([0, 0])
  |> lineTo({ to: [2, 2], tag: \"yo\" }, %)
  |> lineTo([3, 1], %)
  |> angledLineThatIntersects({ angle: 180, intersectTag: 'yo', offset: -1 * scale, tag: \"yo2\" }, %)
fn half = (v) => { return v / 2 }
const intersect = half(segEndX('yo2', part001)).x[0]
show(part001)
";

fn is_leaf(node: &NodeRef<'_>) -> bool {
    match node {
        NodeRef::Identifier(_) => true,
        NodeRef::Expr(expr) => matches!(
            expr,
            kcl_parser::ast::Expr::Literal(_)
                | kcl_parser::ast::Expr::Identifier(_)
                | kcl_parser::ast::Expr::PipeSubstitution(_)
        ),
        _ => false,
    }
}

#[test]
fn leaves_are_found_from_their_start_offset() {
    let program = parse_source(SOURCE).unwrap();
    let mut leaves = 0;
    for (path, node) in descendants(&program) {
        if !is_leaf(&node) {
            continue;
        }
        leaves += 1;
        let found = path_of(&program, node.span().start()).unwrap();
        assert_eq!(found, path, "leaf at {:?}", node.span());
        assert_eq!(range_of(&program, &found).unwrap(), node.span());
    }
    assert!(leaves > 20);
}

#[test]
fn every_node_is_found_from_its_range() {
    let program = parse_source(SOURCE).unwrap();
    for (_, node) in descendants(&program) {
        let span = node.span();
        let path = path_of_range(&program, span).unwrap();
        assert_eq!(range_of(&program, &path).unwrap(), span);
    }
}

#[test]
fn every_offset_resolves_to_an_enclosing_node() {
    let program = parse_source(SOURCE).unwrap();
    for offset in 0..SOURCE.len() {
        let path = path_of(&program, offset).unwrap();
        let span = range_of(&program, &path).unwrap();
        assert!(span.contains(offset), "offset {offset} resolved to {span:?}");
    }
    assert!(matches!(
        path_of(&program, SOURCE.len()),
        Err(PathError::OffsetOutOfRange { .. })
    ));
}

#[test]
fn path_goes_stale_after_edit() {
    let before = parse_source("const a = f(1, 2, 3)").unwrap();
    let path = path_of(&before, 18).unwrap();
    assert_eq!(range_of(&before, &path).unwrap(), Span::new(18, 19));

    // Same path on a tree with fewer arguments must not land elsewhere.
    let after = parse_source("const a = f(1)").unwrap();
    assert!(matches!(range_of(&after, &path), Err(PathError::StaleStep { .. })));
}

#[test]
fn same_path_same_node_on_structurally_equal_trees() {
    let a = parse_source("const a = line([1, 2], x)").unwrap();
    let b = parse_source("const   a=line( [1,2] ,x )").unwrap();
    let path = path_of(&a, 19).unwrap();
    let node_a = kcl_parser::node_at(&a, &path).unwrap();
    let node_b = kcl_parser::node_at(&b, &path).unwrap();
    match (node_a, node_b) {
        (NodeRef::Expr(x), NodeRef::Expr(y)) => {
            assert_eq!(kcl_parser::recast::recast_expr(x), kcl_parser::recast::recast_expr(y))
        }
        other => panic!("unexpected nodes {other:?}"),
    }
}
