//! # Solids and Output
//!
//! `extrude` turns a sketch into a solid; `show` hands values to the host.

use super::args::Args;
use config::constants::approx_zero;
use crate::error::RuntimeError;
use crate::sketch::ExtrudeGroup;
use crate::value::Value;

/// Sweep a sketch along its plane normal.
///
/// ## KCL Signature
///
/// `extrude(length, sketch)`
///
/// ## Returns
///
/// A solid with one wall face per sketch segment
pub fn eval_extrude(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_len(2)?;
    let length = args.number(0)?;
    if approx_zero(length) {
        return Err(RuntimeError::invalid_argument(
            "extrude length must be non-zero",
            args.get(0)?.span,
        ));
    }
    let sketch = args.sketch(1)?;
    Ok(ExtrudeGroup::from_sketch(sketch, length).into())
}

/// Append each argument to the program's output accumulator.
///
/// ## KCL Signature
///
/// `show(value, ...)`
pub fn eval_show(args: &mut Args<'_>) -> Result<Value, RuntimeError> {
    let shown = std::mem::take(&mut args.values);
    args.output.extend(shown.into_iter().map(|arg| arg.value));
    Ok(Value::None)
}
