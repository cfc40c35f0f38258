//! # Math Functions
//!
//! Numeric helpers. Trigonometry works in degrees, matching the angles taken
//! by the sketch primitives.

use super::args::Args;
use config::constants::approx_zero;
use crate::error::RuntimeError;
use crate::value::Value;

fn unary(args: &Args<'_>, f: impl FnOnce(f64) -> f64) -> Result<Value, RuntimeError> {
    args.expect_len(1)?;
    Ok(Value::Number(f(args.number(0)?)))
}

/// `asin`/`acos` argument check.
fn unit_range(args: &Args<'_>) -> Result<f64, RuntimeError> {
    args.expect_len(1)?;
    let x = args.number(0)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(RuntimeError::invalid_argument(
            format!("`{}` expects a value in [-1, 1], got {x}", args.function),
            args.get(0)?.span,
        ));
    }
    Ok(x)
}

// =============================================================================
// TRIGONOMETRY
// =============================================================================

pub fn eval_sin(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, |deg| deg.to_radians().sin())
}

pub fn eval_cos(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, |deg| deg.to_radians().cos())
}

pub fn eval_tan(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, |deg| deg.to_radians().tan())
}

pub fn eval_asin(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(unit_range(args)?.asin().to_degrees()))
}

pub fn eval_acos(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(unit_range(args)?.acos().to_degrees()))
}

pub fn eval_atan(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, |x| x.atan().to_degrees())
}

// =============================================================================
// RIGHT TRIANGLES
// =============================================================================

/// `(hyp, leg)` with `|leg|` clamped to `|hyp|`.
fn legs(args: &Args<'_>) -> Result<(f64, f64), RuntimeError> {
    args.expect_len(2)?;
    let hyp = args.number(0)?.abs();
    let leg = args.number(1)?.abs().min(hyp);
    if approx_zero(hyp) {
        return Err(RuntimeError::invalid_argument("hypotenuse must be non-zero", args.get(0)?.span));
    }
    Ok((hyp, leg))
}

/// `legLen(hyp, leg)`: length of the other leg.
pub fn eval_leg_len(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    let (hyp, leg) = legs(args)?;
    Ok(Value::Number((hyp * hyp - leg * leg).sqrt()))
}

/// `legAngX(hyp, leg)`: angle in degrees between the hypotenuse and `leg`.
pub fn eval_leg_ang_x(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    let (hyp, leg) = legs(args)?;
    Ok(Value::Number((leg / hyp).acos().to_degrees()))
}

/// `legAngY(hyp, leg)`: angle in degrees opposite `leg`.
pub fn eval_leg_ang_y(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    let (hyp, leg) = legs(args)?;
    Ok(Value::Number((leg / hyp).asin().to_degrees()))
}

// =============================================================================
// ARITHMETIC
// =============================================================================

pub fn eval_sqrt(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(1)?;
    let x = args.number(0)?;
    if x < 0.0 {
        return Err(RuntimeError::invalid_argument(
            format!("cannot take the square root of {x}"),
            args.get(0)?.span,
        ));
    }
    Ok(Value::Number(x.sqrt()))
}

pub fn eval_abs(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, f64::abs)
}

pub fn eval_floor(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, f64::floor)
}

pub fn eval_ceil(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    unary(args, f64::ceil)
}

fn fold(args: &Args<'_>, f: fn(f64, f64) -> f64) -> Result<Value, RuntimeError> {
    let first = args.number(0)?;
    let mut acc = first;
    for arg in args.values.iter().skip(1) {
        acc = f(acc, arg.number()?);
    }
    Ok(Value::Number(acc))
}

/// `min(a, b, ...)`: smallest of one or more numbers.
pub fn eval_min(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    fold(args, f64::min)
}

/// `max(a, b, ...)`: largest of one or more numbers.
pub fn eval_max(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    fold(args, f64::max)
}

pub fn eval_pow(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    Ok(Value::Number(args.number(0)?.powf(args.number(1)?)))
}

pub fn eval_pi(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(0)?;
    Ok(Value::Number(std::f64::consts::PI))
}
