//! # Sketch Primitives
//!
//! Functions that start a sketch or extend it by one straight segment.
//!
//! Every primitive takes its data first and the sketch last:
//!
//! ```text
//! startSketchAt([0, 0])
//!   |> lineTo([2, 2], %)          // absolute
//!   |> line({ to: [1, 0], tag: "a" }, %)   // relative, tagged
//!   |> angledLine([45, 3], %)     // polar, degrees
//!   |> close(%)
//! ```
//!
//! Each call takes the sketch argument by value and returns it with one more
//! segment whose span is the call's range.

use super::args::Args;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::sketch::{Segment, SegmentKind, SketchGroup};
use crate::value::Value;
use glam::DVec2;
use kcl_parser::Span;

/// Unit vector pointing `degrees` counter-clockwise from +x.
pub(crate) fn direction(degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(cos, sin)
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

fn push(
    args: &Args<'_>,
    sketch: SketchGroup,
    kind: SegmentKind,
    to: DVec2,
    tag: Option<String>,
) -> Result<Value, RuntimeError> {
    Ok(sketch.extend(kind, to, tag, args.call_span)?.into())
}

fn not_vertical(dir: DVec2, args: &Args<'_>) -> Result<(), RuntimeError> {
    if dir.x.abs() < args.tolerance {
        return Err(RuntimeError::invalid_geometry(
            format!("`{}` cannot follow a vertical angle", args.function),
            args.call_span,
        ));
    }
    Ok(())
}

fn not_horizontal(dir: DVec2, args: &Args<'_>) -> Result<(), RuntimeError> {
    if dir.y.abs() < args.tolerance {
        return Err(RuntimeError::invalid_geometry(
            format!("`{}` cannot follow a horizontal angle", args.function),
            args.call_span,
        ));
    }
    Ok(())
}

// =============================================================================
// START
// =============================================================================

/// Begin a new sketch with the pen at a point.
///
/// ## KCL Signature
///
/// `startSketchAt([x, y])` or `startSketchAt({ to: [x, y], tag })`
pub fn eval_start_sketch_at(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(1)?;
    let (at, tag) = args.point_data(0, "to")?;
    Ok(SketchGroup::new(at, tag, args.call_span).into())
}

// =============================================================================
// STRAIGHT LINES
// =============================================================================

/// `lineTo([x, y], sketch)`: line to an absolute point.
pub fn eval_line_to(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (to, tag) = args.point_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    push(args, sketch, SegmentKind::LineTo, to, tag)
}

/// `line([dx, dy], sketch)`: line relative to the pen.
pub fn eval_line(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (delta, tag) = args.point_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    let to = sketch.pen() + delta;
    push(args, sketch, SegmentKind::Line, to, tag)
}

/// `xLineTo(x, sketch)`: horizontal line to an absolute x.
pub fn eval_x_line_to(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (x, tag) = args.number_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    let to = DVec2::new(x, sketch.pen().y);
    push(args, sketch, SegmentKind::XLineTo, to, tag)
}

/// `yLineTo(y, sketch)`: vertical line to an absolute y.
pub fn eval_y_line_to(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (y, tag) = args.number_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    let to = DVec2::new(sketch.pen().x, y);
    push(args, sketch, SegmentKind::YLineTo, to, tag)
}

/// `xLine(length, sketch)`: horizontal line relative to the pen.
pub fn eval_x_line(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (length, tag) = args.number_data(0, "length")?;
    let sketch = args.take_sketch(1)?;
    let to = sketch.pen() + DVec2::new(length, 0.0);
    push(args, sketch, SegmentKind::XLine, to, tag)
}

/// `yLine(length, sketch)`: vertical line relative to the pen.
pub fn eval_y_line(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (length, tag) = args.number_data(0, "length")?;
    let sketch = args.take_sketch(1)?;
    let to = sketch.pen() + DVec2::new(0.0, length);
    push(args, sketch, SegmentKind::YLine, to, tag)
}

// =============================================================================
// ANGLED LINES
// =============================================================================

/// `angledLine([angle, length], sketch)`: polar line from the pen.
pub fn eval_angled_line(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (angle, length, tag) = args.angle_data(0, "length")?;
    let sketch = args.take_sketch(1)?;
    let to = sketch.pen() + direction(angle) * length;
    push(args, sketch, SegmentKind::AngledLine, to, tag)
}

/// `angledLineOfXLength([angle, length], sketch)`: the x-leg has `length`.
pub fn eval_angled_line_of_x_length(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (angle, length, tag) = args.angle_data(0, "length")?;
    let sketch = args.take_sketch(1)?;
    let dir = direction(angle);
    not_vertical(dir, args)?;
    let dx = length * dir.x.signum();
    let to = sketch.pen() + DVec2::new(dx, dx * dir.y / dir.x);
    push(args, sketch, SegmentKind::AngledLineOfXLength, to, tag)
}

/// `angledLineOfYLength([angle, length], sketch)`: the y-leg has `length`.
pub fn eval_angled_line_of_y_length(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (angle, length, tag) = args.angle_data(0, "length")?;
    let sketch = args.take_sketch(1)?;
    let dir = direction(angle);
    not_horizontal(dir, args)?;
    let dy = length * dir.y.signum();
    let to = sketch.pen() + DVec2::new(dy * dir.x / dir.y, dy);
    push(args, sketch, SegmentKind::AngledLineOfYLength, to, tag)
}

/// `angledLineToX([angle, x], sketch)`: follow `angle` until reaching `x`.
pub fn eval_angled_line_to_x(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (angle, x, tag) = args.angle_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    let dir = direction(angle);
    not_vertical(dir, args)?;
    let pen = sketch.pen();
    let dx = x - pen.x;
    let to = DVec2::new(x, pen.y + dx * dir.y / dir.x);
    push(args, sketch, SegmentKind::AngledLineToX, to, tag)
}

/// `angledLineToY([angle, y], sketch)`: follow `angle` until reaching `y`.
pub fn eval_angled_line_to_y(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let (angle, y, tag) = args.angle_data(0, "to")?;
    let sketch = args.take_sketch(1)?;
    let dir = direction(angle);
    not_horizontal(dir, args)?;
    let pen = sketch.pen();
    let dy = y - pen.y;
    let to = DVec2::new(pen.x + dy * dir.x / dir.y, y);
    push(args, sketch, SegmentKind::AngledLineToY, to, tag)
}

// =============================================================================
// INTERSECTION
// =============================================================================

/// Point where a ray from `origin` at `angle` degrees meets the infinite line
/// through `reference`, shifted by `offset` along the reference's left normal.
///
/// The left normal of direction `d` is `(-d.y, d.x) / |d|`. The ray parameter
/// may be negative, in which case the point lies behind `origin`.
///
/// ## Returns
///
/// The intersection point, or `ParallelLines` located at `span` when the 2D
/// cross product of the two directions is below `tolerance`
pub fn ray_line_intersection(
    origin: DVec2,
    angle: f64,
    reference: &Segment,
    offset: f64,
    tolerance: f64,
    span: Span,
) -> Result<DVec2, RuntimeError> {
    let d = reference.direction();
    if d.length() < tolerance {
        return Err(RuntimeError::invalid_geometry(
            "intersection reference segment has zero length",
            span,
        ));
    }
    let normal = d.perp() / d.length();
    let q = reference.from + normal * offset;
    let r = direction(angle);

    let denom = cross(r, d);
    if denom.abs() < tolerance {
        return Err(RuntimeError::new(RuntimeErrorKind::ParallelLines, span));
    }
    let t = cross(q - origin, d) / denom;
    Ok(origin + r * t)
}

/// Line from the pen at an angle until it meets a tagged segment.
///
/// ## KCL Signature
///
/// `angledLineThatIntersects({ angle, intersectTag, offset?, tag? }, sketch)`
///
/// `offset` shifts the tagged segment's line along its left normal before
/// intersecting; it defaults to 0.
pub fn eval_angled_line_that_intersects(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let data = args.get(0)?;
    let angle = data.field("angle")?.expect_number(data.span)?;
    let intersect_tag = data.field("intersectTag")?.expect_str(data.span)?.to_string();
    let offset = match data.field("offset") {
        Ok(value) => value.expect_number(data.span)?,
        Err(_) => 0.0,
    };
    let tag = data.tag()?;

    let sketch = args.take_sketch(1)?;
    let to = {
        let reference = sketch.segment(&intersect_tag, args.call_span)?;
        ray_line_intersection(
            sketch.pen(),
            angle,
            &reference,
            offset,
            args.tolerance,
            args.call_span,
        )?
    };
    push(args, sketch, SegmentKind::AngledLineThatIntersects, to, tag)
}

// =============================================================================
// CLOSE
// =============================================================================

/// Line from the pen back to the start point.
///
/// ## KCL Signature
///
/// `close(sketch)` or `close(tag, sketch)`
pub fn eval_close(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len_between(1, 2)?;
    let (tag, index) = if args.len() == 2 {
        (Some(args.string(0)?.to_string()), 1)
    } else {
        (None, 0)
    };
    let sketch = args.take_sketch(index)?;
    let to = sketch.start.to;
    push(args, sketch, SegmentKind::Close, to, tag)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference(from: DVec2, to: DVec2) -> Segment {
        Segment {
            kind: SegmentKind::LineTo,
            from,
            to,
            tag: Some("yo".into()),
            span: Span::default(),
        }
    }

    #[test]
    fn test_direction() {
        assert_relative_eq!(direction(0.0).x, 1.0);
        assert_relative_eq!(direction(90.0).y, 1.0);
        assert_relative_eq!(direction(180.0).x, -1.0);
    }

    #[test]
    fn test_intersection_with_negative_offset() {
        let seg = reference(DVec2::ZERO, DVec2::new(2.0, 2.0));
        let p = ray_line_intersection(DVec2::new(3.0, 1.0), 180.0, &seg, -1.0, 1e-10, Span::default()).unwrap();
        assert_relative_eq!(p.x, 1.0 + 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_without_offset() {
        let seg = reference(DVec2::ZERO, DVec2::new(2.0, 2.0));
        let p = ray_line_intersection(DVec2::new(3.0, 1.0), 180.0, &seg, 0.0, 1e-10, Span::default()).unwrap();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_behind_origin() {
        let seg = reference(DVec2::ZERO, DVec2::new(0.0, 1.0));
        let p = ray_line_intersection(DVec2::new(3.0, 0.5), 0.0, &seg, 0.0, 1e-10, Span::default()).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_parallel() {
        let seg = reference(DVec2::ZERO, DVec2::new(1.0, 0.0));
        let err = ray_line_intersection(DVec2::new(0.0, 1.0), 180.0, &seg, 0.0, 1e-10, Span::new(4, 9)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ParallelLines);
        assert_eq!(err.span, Span::new(4, 9));
    }
}
