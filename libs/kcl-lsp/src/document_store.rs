use kcl_session::Session;
use std::collections::HashMap;
use tokio::task::JoinHandle;
use tower_lsp::lsp_types::Url;

/// An open document and the session that evaluates it.
pub struct Document {
    /// Latest text received from the client.
    pub text: String,
    pub session: Session,
    watcher: Option<JoinHandle<()>>,
}

impl Document {
    pub fn new(text: String, session: Session) -> Self {
        Self {
            text,
            session,
            watcher: None,
        }
    }

    /// Attach the task forwarding this document's snapshots to the client.
    pub fn with_watcher(mut self, watcher: JoinHandle<()>) -> Self {
        self.watcher = Some(watcher);
        self
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}

#[derive(Default)]
pub struct DocumentStore {
    documents: HashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    /// Insert `document`, dropping any previous one under `uri`.
    pub fn insert(&mut self, uri: Url, document: Document) {
        self.documents.insert(uri, document);
    }

    /// Replace the text of an open document and schedule its evaluation.
    ///
    /// ## Returns
    ///
    /// The scheduled generation, or `None` if `uri` is not open
    pub fn update(&mut self, uri: &Url, text: String) -> Option<u64> {
        let document = self.documents.get_mut(uri)?;
        let generation = document.session.edit(text.clone());
        document.text = text;
        Some(generation)
    }

    pub fn get(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn remove(&mut self, uri: &Url) -> Option<Document> {
        self.documents.remove(uri)
    }
}
