//! # Standard Library
//!
//! Built-in functions available to every program, looked up by name when a
//! call's callee is not bound in scope.
//!
//! ## Modules
//!
//! - [`sketch`]: sketch primitives and `angledLineThatIntersects`
//! - [`segment`]: tag and last-segment introspection
//! - [`math`]: degree trigonometry and arithmetic helpers
//! - [`extrude`]: `extrude` and `show`

pub mod args;
pub mod extrude;
pub mod math;
pub mod segment;
pub mod sketch;

pub use args::{Arg, Args};

use crate::error::RuntimeError;
use crate::value::Value;

/// Signature shared by every built-in.
pub type StdFn = fn(&mut Args<'_>) -> Result<Value, RuntimeError>;

/// Names of every built-in, in registry order.
pub const NAMES: &[&str] = &[
    "startSketchAt",
    "lineTo",
    "line",
    "xLineTo",
    "yLineTo",
    "xLine",
    "yLine",
    "angledLine",
    "angledLineOfXLength",
    "angledLineOfYLength",
    "angledLineToX",
    "angledLineToY",
    "angledLineThatIntersects",
    "close",
    "segEndX",
    "segEndY",
    "segLen",
    "segAng",
    "lastSegX",
    "lastSegY",
    "legLen",
    "legAngX",
    "legAngY",
    "sin",
    "cos",
    "tan",
    "asin",
    "acos",
    "atan",
    "sqrt",
    "abs",
    "floor",
    "ceil",
    "min",
    "max",
    "pow",
    "pi",
    "extrude",
    "show",
];

/// Built-in named `name`, if any.
pub fn lookup(name: &str) -> Option<StdFn> {
    let f: StdFn = match name {
        "startSketchAt" => sketch::eval_start_sketch_at,
        "lineTo" => sketch::eval_line_to,
        "line" => sketch::eval_line,
        "xLineTo" => sketch::eval_x_line_to,
        "yLineTo" => sketch::eval_y_line_to,
        "xLine" => sketch::eval_x_line,
        "yLine" => sketch::eval_y_line,
        "angledLine" => sketch::eval_angled_line,
        "angledLineOfXLength" => sketch::eval_angled_line_of_x_length,
        "angledLineOfYLength" => sketch::eval_angled_line_of_y_length,
        "angledLineToX" => sketch::eval_angled_line_to_x,
        "angledLineToY" => sketch::eval_angled_line_to_y,
        "angledLineThatIntersects" => sketch::eval_angled_line_that_intersects,
        "close" => sketch::eval_close,

        "segEndX" => segment::eval_seg_end_x,
        "segEndY" => segment::eval_seg_end_y,
        "segLen" => segment::eval_seg_len,
        "segAng" => segment::eval_seg_ang,
        "lastSegX" => segment::eval_last_seg_x,
        "lastSegY" => segment::eval_last_seg_y,

        "legLen" => math::eval_leg_len,
        "legAngX" => math::eval_leg_ang_x,
        "legAngY" => math::eval_leg_ang_y,
        "sin" => math::eval_sin,
        "cos" => math::eval_cos,
        "tan" => math::eval_tan,
        "asin" => math::eval_asin,
        "acos" => math::eval_acos,
        "atan" => math::eval_atan,
        "sqrt" => math::eval_sqrt,
        "abs" => math::eval_abs,
        "floor" => math::eval_floor,
        "ceil" => math::eval_ceil,
        "min" => math::eval_min,
        "max" => math::eval_max,
        "pow" => math::eval_pow,
        "pi" => math::eval_pi,

        "extrude" => extrude::eval_extrude,
        "show" => extrude::eval_show,
        _ => return None,
    };
    Some(f)
}
