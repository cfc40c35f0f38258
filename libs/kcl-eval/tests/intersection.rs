use approx::assert_relative_eq;
use kcl_eval::{execute, execute_source, ProgramMemory, RuntimeErrorKind, SegmentKind, Value};
use kcl_parser::{parse_source, DiagnosticKind};

fn scenario(offset: &str) -> String {
    format!(
        "const part001 = startSketchAt([0, 0])
  |> lineTo({{to:[2, 2], tag: \"yo\"}}, %)
  |> lineTo([3, 1], %)
  |> angledLineThatIntersects({{ angle: 180, intersectTag: 'yo', offset: {offset}, tag: \"yo2\" }}, %)
const intersect = segEndX('yo2', part001)
show(part001)"
    )
}

fn intersect_x(offset: &str) -> f64 {
    let memory = execute_source(&scenario(offset)).unwrap_or_else(|d| panic!("{}", d.message));
    match memory.get("intersect") {
        Some(Value::Number(x)) => *x,
        other => panic!("intersect = {other:?}"),
    }
}

#[test]
fn intersection_with_offset_minus_one() {
    assert_relative_eq!(intersect_x("-1"), 1.0 + 2f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn intersection_with_zero_offset() {
    assert_relative_eq!(intersect_x("0"), 1.0, epsilon = 1e-9);
}

#[test]
fn intersection_offset_may_be_an_expression() {
    let source = scenario("-2 / 2");
    let memory = execute_source(&source).unwrap();
    let x = memory.get("intersect").and_then(Value::as_number).unwrap();
    assert_relative_eq!(x, 1.0 + 2f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn scenario_shows_the_sketch() {
    let memory = execute_source(&scenario("-1")).unwrap();
    assert_eq!(memory.sketch.len(), 1);
    let Value::SketchGroup(sketch) = &memory.sketch[0] else {
        panic!("expected a sketch, got {:?}", memory.sketch[0]);
    };
    assert_eq!(sketch.value.len(), 3);
    let last = &sketch.value[2];
    assert_eq!(last.kind, SegmentKind::AngledLineThatIntersects);
    assert_eq!(last.tag.as_deref(), Some("yo2"));
    assert_relative_eq!(last.from.x, 3.0);
    assert_relative_eq!(last.to.y, 1.0, epsilon = 1e-12);
    assert_eq!(memory.get("part001"), Some(&memory.sketch[0]));
}

#[test]
fn parallel_lines_fail() {
    let source = "const s = startSketchAt([0, 0])
  |> xLine({ length: 2, tag: 'base' }, %)
  |> yLine(1, %)
  |> angledLineThatIntersects({ angle: 180, intersectTag: 'base', offset: 0 }, %)";
    let program = parse_source(source).unwrap();
    let err = execute(&program, ProgramMemory::new()).unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::ParallelLines);
    assert_eq!(err.to_string(), "lines are parallel");
    let call = err.span.slice(source).unwrap();
    assert!(call.starts_with("angledLineThatIntersects("), "{call}");
}

#[test]
fn unknown_intersect_tag_reports_call_range() {
    let source = "const s = startSketchAt([0, 0])
  |> lineTo([1, 1], %)
  |> angledLineThatIntersects({ angle: 90, intersectTag: 'missing' }, %)";
    let program = parse_source(source).unwrap();
    let err = execute(&program, ProgramMemory::new()).unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::UnknownTag("missing".into()));
    assert_eq!(
        err.span.slice(source),
        Some("angledLineThatIntersects({ angle: 90, intersectTag: 'missing' }, %)")
    );
}

#[test]
fn unknown_segment_tag_reports_lookup_call() {
    let source = "const s = startSketchAt([0, 0]) |> lineTo({ to: [1, 1], tag: 'a' }, %)\nconst x = segEndX('b', s)";
    let err = execute_source(source).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::Runtime);
    assert_eq!(err.span.slice(source), Some("segEndX('b', s)"));
    assert_eq!(err.message, "no segment tagged `b`");
}
