//! # Segment Introspection
//!
//! Read measurements back out of a sketch: by tag (`segEndX('yo', s)`) or
//! from its last segment (`lastSegX(s)`). Unknown tags fail on the range of
//! the lookup call.

use super::args::Args;
use crate::error::RuntimeError;
use crate::sketch::Segment;
use crate::value::Value;
use std::borrow::Cow;

fn tagged<'s>(args: &'s Args<'_>) -> Result<Cow<'s, Segment>, RuntimeError> {
    args.expect_len(2)?;
    let tag = args.string(0)?;
    args.sketch(1)?.segment(tag, args.call_span)
}

/// `segEndX(tag, sketch)`: x of the tagged segment's end point.
pub fn eval_seg_end_x(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(tagged(args)?.to.x))
}

/// `segEndY(tag, sketch)`: y of the tagged segment's end point.
pub fn eval_seg_end_y(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(tagged(args)?.to.y))
}

/// `segLen(tag, sketch)`: length of the tagged segment.
pub fn eval_seg_len(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(tagged(args)?.length()))
}

/// `segAng(tag, sketch)`: direction of the tagged segment in degrees.
pub fn eval_seg_ang(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(tagged(args)?.angle()))
}

/// `lastSegX(sketch)`: x of the pen after the last segment.
pub fn eval_last_seg_x(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(1)?;
    let segment = args.sketch(0)?.last_segment(args.call_span)?;
    Ok(Value::Number(segment.to.x))
}

/// `lastSegY(sketch)`: y of the pen after the last segment.
pub fn eval_last_seg_y(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(1)?;
    let segment = args.sketch(0)?.last_segment(args.call_span)?;
    Ok(Value::Number(segment.to.y))
}
