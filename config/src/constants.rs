//! # Configuration Constants
//!
//! Centralized constants for the KCL pipeline.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Scheduling**: Debounce window and cooperative lexing granularity
//! - **Formatting**: Canonical recast conventions
//! - **Limits**: Stack growth parameters for deep recursion

use std::fmt;
use std::time::Duration;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used by the geometry library to decide that a ray and a reference line are
/// parallel (the 2D cross product of their directions falls below it) and that
/// a direction is vertical or horizontal.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

// =============================================================================
// SCHEDULING CONSTANTS
// =============================================================================

/// Quiet period in milliseconds before a scheduled re-execution starts.
///
/// Every edit arriving inside the window cancels the pending run and restarts
/// the timer, so only the latest source is evaluated.
///
/// # Example
///
/// ```rust
/// use config::constants::DEBOUNCE_MILLIS;
/// assert_eq!(DEBOUNCE_MILLIS, 100);
/// ```
pub const DEBOUNCE_MILLIS: u64 = 100;

/// Number of tokens the cooperative lexer produces between two yields.
///
/// # Example
///
/// ```rust
/// use config::constants::LEXER_YIELD_INTERVAL;
/// assert!(LEXER_YIELD_INTERVAL >= 1);
/// ```
pub const LEXER_YIELD_INTERVAL: usize = 256;

// =============================================================================
// FORMATTING CONSTANTS
// =============================================================================

/// Indentation unit used by recast.
pub const RECAST_INDENT: &str = "  ";

/// Objects whose single-line rendering is wider than this many characters are
/// printed one property per line.
pub const RECAST_MAX_INLINE_WIDTH: usize = 60;

// =============================================================================
// LIMITS
// =============================================================================

/// Remaining stack (bytes) below which recursive descent grows the stack.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Bytes of stack allocated each time `stacker` grows the stack.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_STACK_SIZE_BYTES > STACKER_RED_ZONE_BYTES);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting of user-function calls before execution fails.
///
/// Unbounded recursion in a program is reported as a runtime error at the
/// call that crossed this depth.
///
/// # Examples
/// ```
/// use config::constants::MAX_CALL_DEPTH;
/// assert!(MAX_CALL_DEPTH >= 64);
/// ```
pub const MAX_CALL_DEPTH: usize = 1000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Check if a value is approximately zero.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-12));
/// assert!(!approx_zero(0.001));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

// =============================================================================
// PIPELINE CONFIG
// =============================================================================

/// Immutable snapshot of the tunables the session layer runs with.
///
/// # Examples
/// ```
/// use config::constants::PipelineConfig;
/// let config = PipelineConfig::default();
/// assert_eq!(config.debounce.as_millis(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Quiet period before a scheduled execution starts.
    pub debounce: Duration,
    /// Tokens lexed between cooperative yields.
    pub lexer_yield_interval: usize,
    /// Parallel-line tolerance handed to the geometry library.
    pub tolerance: f64,
}

impl PipelineConfig {
    /// Builds a configuration, rejecting values that would stall or break the
    /// pipeline.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use config::constants::PipelineConfig;
    /// let cfg = PipelineConfig::new(Duration::from_millis(10), 32, 1e-9).expect("valid config");
    /// assert_eq!(cfg.lexer_yield_interval, 32);
    /// ```
    pub fn new(
        debounce: Duration,
        lexer_yield_interval: usize,
        tolerance: f64,
    ) -> Result<Self, ConfigError> {
        if tolerance <= 0.0 || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if lexer_yield_interval == 0 {
            return Err(ConfigError::InvalidYieldInterval(lexer_yield_interval));
        }
        Ok(Self {
            debounce,
            lexer_yield_interval,
            tolerance,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MILLIS),
            lexer_yield_interval: LEXER_YIELD_INTERVAL,
            tolerance: EPSILON,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the lexer would never yield.
    InvalidYieldInterval(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidYieldInterval(value) => {
                write!(f, "lexer_yield_interval must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
