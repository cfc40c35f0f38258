//! # Language Server Implementation
//!
//! Tower-lsp based language server for KCL.
//!
//! Each open document owns a [`Session`]. Edits are forwarded to the session,
//! which debounces them; a watcher task publishes the diagnostic of every
//! committed snapshot.

use crate::document_store::{Document, DocumentStore};
use crate::line_index::LineIndex;
use config::constants::PipelineConfig;
use kcl_parser::ast::Expr;
use kcl_parser::{node_at, path_of, Diagnostic as KclDiagnostic, NodeRef};
use kcl_session::Session;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Converts a pipeline diagnostic into an LSP one, positioned in `source`.
pub fn to_lsp_diagnostic(source: &str, diagnostic: &KclDiagnostic) -> Diagnostic {
    Diagnostic {
        range: LineIndex::new(source).range(diagnostic.span),
        severity: Some(if diagnostic.fatal {
            DiagnosticSeverity::ERROR
        } else {
            DiagnosticSeverity::WARNING
        }),
        source: Some("kcl".to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

/// KCL Language Server implementation.
pub struct KclLanguageServer {
    client: Client,
    documents: Mutex<DocumentStore>,
    config: PipelineConfig,
}

impl KclLanguageServer {
    /// Creates a new language server instance.
    pub fn new(client: Client) -> Self {
        Self::with_config(client, PipelineConfig::default())
    }

    pub fn with_config(client: Client, config: PipelineConfig) -> Self {
        Self {
            client,
            documents: Mutex::new(DocumentStore::new()),
            config,
        }
    }

    /// Spawns the task that publishes diagnostics for every snapshot
    /// `session` commits.
    fn watch(&self, uri: Url, session: &Session) -> JoinHandle<()> {
        let client = self.client.clone();
        let mut snapshots = session.subscribe();
        tokio::spawn(async move {
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                let diagnostics = snapshot
                    .diagnostic
                    .iter()
                    .map(|diagnostic| to_lsp_diagnostic(&snapshot.source, diagnostic))
                    .collect();
                tracing::trace!(%uri, generation = snapshot.generation, "publishing diagnostics");
                client.publish_diagnostics(uri.clone(), diagnostics, None).await;
            }
        })
    }

    async fn open(&self, uri: Url, text: String) {
        let session = match Session::new(self.config) {
            Ok(session) => session,
            Err(err) => {
                self.client.log_message(MessageType::ERROR, err.to_string()).await;
                return;
            }
        };
        let watcher = self.watch(uri.clone(), &session);
        session.edit(text.clone());
        let document = Document::new(text, session).with_watcher(watcher);
        self.documents.lock().await.insert(uri, document);
    }

    /// Describes the value bound to the identifier under `position`, using
    /// the last snapshot of the document.
    ///
    /// After a rejected edit the snapshot's program trails the document text.
    /// The position is then resolved in the text the program was parsed from,
    /// and the name found there must also be the word under the cursor now.
    async fn describe(&self, uri: &Url, position: Position) -> Option<String> {
        let snapshot = self.documents.lock().await.get(uri)?.session.snapshot();
        let program = snapshot.program.as_ref()?;
        let offset = LineIndex::new(&snapshot.program_source).offset(position)?;
        let path = path_of(program, offset).ok()?;
        let name = match node_at(program, &path).ok()? {
            NodeRef::Identifier(ident) | NodeRef::Expr(Expr::Identifier(ident)) => &ident.name,
            _ => return None,
        };
        if snapshot.source != snapshot.program_source {
            let current = LineIndex::new(&snapshot.source).offset(position)?;
            if word_at(&snapshot.source, current) != Some(name.as_str()) {
                tracing::debug!(%uri, %name, "hover target changed since last parse");
                return None;
            }
        }
        let value = snapshot.memory.get(name)?;
        Some(format!("{name}: {}\n\n{value}", value.type_name()))
    }
}

/// Identifier characters around byte `offset` of `text`.
fn word_at(text: &str, offset: usize) -> Option<&str> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let before = text.get(..offset)?;
    let after = text.get(offset..)?;
    let start = before
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let end = after.find(|c: char| !is_word(c)).map_or(text.len(), |i| offset + i);
    (start < end).then(|| &text[start..end])
}

#[tower_lsp::async_trait]
impl LanguageServer for KclLanguageServer {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "KCL LSP initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.open(params.text_document.uri, params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // FULL sync: the last change carries the whole text.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let uri = params.text_document.uri;
        let updated = self.documents.lock().await.update(&uri, change.text.clone());
        if updated.is_none() {
            tracing::debug!(%uri, "change for unopened document");
            self.open(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        drop(self.documents.lock().await.remove(&uri));
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        let (text, session) = match self.documents.lock().await.get(&uri) {
            Some(document) => (document.text.clone(), document.session.clone()),
            None => return Ok(None),
        };
        match session.format(&text) {
            Ok(formatted) if formatted == text => Ok(Some(vec![])),
            Ok(formatted) => Ok(Some(vec![TextEdit {
                range: LineIndex::new(&text).full_range(),
                new_text: formatted,
            }])),
            Err(diagnostic) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("cannot format {uri}: {}", diagnostic.message),
                    )
                    .await;
                Ok(None)
            }
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params;
        let description = self
            .describe(&position.text_document.uri, position.position)
            .await;
        Ok(description.map(|text| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: text,
            }),
            range: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_parser::Span;

    #[test]
    fn test_to_lsp_diagnostic() {
        let source = "const a = 1\nconst b = 1 / 0";
        let diagnostic = KclDiagnostic::runtime("division by zero".into(), Span::new(22, 27));
        let converted = to_lsp_diagnostic(source, &diagnostic);
        assert_eq!(
            converted.range,
            Range::new(Position::new(1, 10), Position::new(1, 15))
        );
        assert_eq!(converted.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(converted.source.as_deref(), Some("kcl"));
        assert_eq!(converted.message, "division by zero");
    }

    #[test]
    fn test_word_at() {
        let text = "const qq = 1\nconst h = width +";
        assert_eq!(word_at(text, 6), Some("qq"));
        assert_eq!(word_at(text, 8), Some("qq"));
        assert_eq!(word_at(text, 23), Some("width"));
        assert_eq!(word_at(text, 5), Some("const"));
        assert_eq!(word_at(text, 10), None);
        assert_eq!(word_at(text, 999), None);
    }
}
