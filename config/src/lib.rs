//! # Config Crate
//!
//! Centralized configuration constants for the KCL language pipeline.
//! Tolerances, scheduling windows and formatting conventions live here so the
//! lexer, executor, formatter and session layer never disagree about them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, DEBOUNCE_MILLIS};
//!
//! // Two direction vectors are treated as parallel below EPSILON.
//! let cross: f64 = 1e-12;
//! assert!(cross.abs() < EPSILON);
//!
//! // Edits arriving closer together than the debounce window coalesce.
//! assert!(DEBOUNCE_MILLIS > 0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Validated Overrides**: Runtime overrides go through [`constants::PipelineConfig::new`]

pub mod constants;
