//! # KCL Session
//!
//! Editing-session layer over the KCL pipeline: debounced re-execution,
//! immutable snapshots and tree write-back.
//!
//! ## Example
//!
//! ```rust
//! use config::constants::PipelineConfig;
//! use kcl_session::Session;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let session = Session::new(PipelineConfig::default()).unwrap();
//! let snapshot = session.execute_now("const a = 1 + 1").await;
//! assert!(snapshot.is_ok());
//! # });
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! kcl-parser → kcl-eval → kcl-session → kcl-lsp
//! ```

pub mod error;
pub mod session;
pub mod snapshot;

pub use error::SessionError;
pub use session::Session;
pub use snapshot::{AstUpdate, Snapshot};
