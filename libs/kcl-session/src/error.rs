//! # Session Errors

use thiserror::Error;

/// Errors raised while setting up a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Sessions spawn their runs on the Tokio runtime they are created in.
    #[error("a session must be created inside a Tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
