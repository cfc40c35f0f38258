//! # KCL Language Server
//!
//! Language Server Protocol implementation for KCL using tower-lsp.
//!
//! ## Features
//!
//! - Diagnostics published from each document's debounced session
//! - Whole-document formatting
//! - Hover showing the value bound to a name in the last execution
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kcl_lsp::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server().await;
//! }
//! ```

pub mod document_store;
pub mod line_index;
pub mod server;

pub use server::KclLanguageServer;

/// Runs the language server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(KclLanguageServer::new);

    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;
}
