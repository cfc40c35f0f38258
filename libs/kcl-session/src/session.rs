//! # Session
//!
//! Runs the lex → parse → execute pipeline for an editing session and
//! publishes the results as [`Snapshot`]s.
//!
//! ## Scheduling
//!
//! ```text
//! edit("a")  ──┐ gen 1 (sleeping)
//! edit("ab") ──┼─ abort gen 1, gen 2 (sleeping)
//! edit("abc")──┼─ abort gen 2, gen 3 (sleeping) ── debounce ── run ── commit gen 3
//!              │
//! execute_now ─┘ bumps the generation too; older runs that finish later are
//!                discarded at commit
//! ```
//!
//! Every scheduled run carries the generation it was scheduled with. A run
//! publishes only if that generation is still current; the check and the
//! publish happen under the same lock that `edit` takes to bump it.

use crate::error::SessionError;
use crate::snapshot::{AstUpdate, Outcome, Snapshot};
use config::constants::PipelineConfig;
use kcl_eval::{Executor, ProgramMemory};
use kcl_parser::{lexer, parse, parse_source, range_of, recast, Diagnostic, NodePath, Program};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Default)]
struct State {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    config: PipelineConfig,
    executor: Executor,
    state: Mutex<State>,
    sender: watch::Sender<Arc<Snapshot>>,
    executions: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Lex, parse and execute `source`.
    ///
    /// ## Returns
    ///
    /// `None` if the run went stale before execution started
    async fn evaluate(&self, source: &str, generation: u64) -> Option<Outcome> {
        let tokens = lexer::lex_async_with_interval(source, self.config.lexer_yield_interval).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "run superseded while lexing");
            return None;
        }
        let program = match tokens {
            Ok(tokens) => match parse(tokens) {
                Ok(program) => program,
                Err(err) => return Some(Outcome::Rejected(err.into())),
            },
            Err(err) => return Some(Outcome::Rejected(err.into())),
        };

        self.executions.fetch_add(1, Ordering::Relaxed);
        Some(match self.executor.execute(&program, ProgramMemory::new()) {
            Ok(memory) => Outcome::Executed { program, memory },
            Err(err) => Outcome::Failed {
                diagnostic: err.into(),
                program,
            },
        })
    }

    async fn run(&self, source: String, generation: u64) -> bool {
        match self.evaluate(&source, generation).await {
            Some(outcome) => self.commit(generation, source, outcome),
            None => false,
        }
    }

    /// Publish `outcome` if `generation` is still current.
    fn commit(&self, generation: u64, source: String, outcome: Outcome) -> bool {
        let state = self.lock();
        if state.generation != generation {
            tracing::warn!(generation, current = state.generation, "discarding stale result");
            return false;
        }
        let previous = self.sender.borrow().clone();
        let snapshot = outcome.into_snapshot(&previous, source, generation);
        tracing::debug!(generation, ok = snapshot.is_ok(), "committed snapshot");
        self.sender.send_replace(Arc::new(snapshot));
        drop(state);
        true
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// An editing session for one document.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
    runtime: Handle,
}

impl Session {
    /// Create a session on the current Tokio runtime.
    ///
    /// ## Returns
    ///
    /// The session, or `SessionError::NoRuntime` outside a runtime
    pub fn new(config: PipelineConfig) -> Result<Self, SessionError> {
        let runtime = Handle::try_current()?;
        let (sender, _) = watch::channel(Arc::new(Snapshot::default()));
        Ok(Self {
            inner: Arc::new(Inner {
                executor: Executor::with_config(&config),
                config,
                state: Mutex::new(State::default()),
                sender,
                executions: AtomicU64::new(0),
            }),
            runtime,
        })
    }

    /// Receiver that observes every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.sender.subscribe()
    }

    /// The latest committed snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.sender.borrow().clone()
    }

    /// Number of runs that reached execution.
    pub fn executions(&self) -> u64 {
        self.inner.executions.load(Ordering::Relaxed)
    }

    /// Invalidate every earlier run and return the new generation.
    fn bump(&self, state: &mut State) -> u64 {
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.abort();
            tracing::debug!(generation = state.generation - 1, "cancelled pending run");
        }
        state.generation
    }

    fn schedule(&self, source: String, delay: Duration) -> u64 {
        let mut state = self.inner.lock();
        let generation = self.bump(&mut state);
        let inner = Arc::clone(&self.inner);
        tracing::debug!(generation, delay_ms = delay.as_millis() as u64, "scheduled run");
        state.pending = Some(self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            inner.run(source, generation).await;
        }));
        generation
    }

    // =========================================================================
    // SOURCE EDITS
    // =========================================================================

    /// Schedule a debounced run of `source`.
    ///
    /// Cancels any pending run. The new run starts after the configured
    /// debounce unless another edit arrives first.
    ///
    /// ## Returns
    ///
    /// The generation the run was scheduled with
    pub fn edit(&self, source: impl Into<String>) -> u64 {
        self.schedule(source.into(), self.inner.config.debounce)
    }

    /// Run `source` immediately, superseding any pending or running run.
    ///
    /// ## Returns
    ///
    /// The latest snapshot once this run has committed, or was superseded
    pub async fn execute_now(&self, source: impl Into<String>) -> Arc<Snapshot> {
        let generation = {
            let mut state = self.inner.lock();
            self.bump(&mut state)
        };
        self.inner.run(source.into(), generation).await;
        self.snapshot()
    }

    /// Canonical formatting of `source`.
    pub fn format(&self, source: &str) -> Result<String, Diagnostic> {
        Ok(recast(&parse_source(source)?))
    }

    // =========================================================================
    // TREE WRITE-BACK
    // =========================================================================

    fn write_back(program: &Program, focus: Option<&NodePath>) -> Result<AstUpdate, Diagnostic> {
        let source = recast(program);
        let program = parse_source(&source)?;
        let focus = focus.and_then(|path| range_of(&program, path).ok());
        Ok(AstUpdate {
            source,
            program,
            focus,
        })
    }

    /// Print an edited tree, re-parse it and schedule its execution.
    ///
    /// ## Parameters
    ///
    /// - `program`: Edited tree; spans need not match any text
    /// - `focus`: Node to re-locate in the printed text
    ///
    /// ## Returns
    ///
    /// The new text and tree with the focused node's new range
    pub fn update_ast(&self, program: &Program, focus: Option<&NodePath>) -> Result<AstUpdate, Diagnostic> {
        let update = Self::write_back(program, focus)?;
        self.schedule(update.source.clone(), Duration::ZERO);
        Ok(update)
    }

    /// Debounced [`Session::update_ast`]: the tree is printed and re-parsed
    /// now, its execution waits for the debounce like [`Session::edit`].
    pub fn update_ast_debounced(
        &self,
        program: &Program,
        focus: Option<&NodePath>,
    ) -> Result<AstUpdate, Diagnostic> {
        let update = Self::write_back(program, focus)?;
        self.schedule(update.source.clone(), self.inner.config.debounce);
        Ok(update)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_eval::Value;
    use kcl_parser::DiagnosticKind;

    fn session() -> Session {
        Session::new(PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        assert!(matches!(
            Session::new(PipelineConfig::default()),
            Err(SessionError::NoRuntime(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_now_commits() {
        let session = session();
        let snapshot = session.execute_now("const a = 2 * 3").await;
        assert_eq!(snapshot.memory.get("a"), Some(&Value::Number(6.0)));
        assert_eq!(snapshot.generation, 1);
        assert!(snapshot.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_error_keeps_last_good_memory() {
        let session = session();
        session.execute_now("const a = 1").await;
        let snapshot = session.execute_now("const a = 1 / 0").await;
        let diagnostic = snapshot.diagnostic.clone().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::Runtime);
        assert_eq!(snapshot.memory.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(snapshot.source, "const a = 1 / 0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_syntax_error_keeps_last_program() {
        let session = session();
        let good = session.execute_now("const a = 1").await;
        let bad = session.execute_now("const = 1").await;
        assert_eq!(bad.diagnostic.as_ref().map(|d| d.kind), Some(DiagnosticKind::Syntax));
        assert_eq!(bad.program, good.program);
        assert_eq!(bad.memory, good.memory);
        assert_eq!(session.executions(), 1);
        assert_eq!(bad.source, "const = 1");
        assert_eq!(bad.program_source, "const a = 1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_discards_stale_generation() {
        let session = session();
        let stale = {
            let mut state = session.inner.lock();
            session.bump(&mut state)
        };
        session.execute_now("const b = 2").await;

        let program = parse_source("const a = 1").unwrap();
        let memory = session.inner.executor.execute(&program, ProgramMemory::new()).unwrap();
        let committed = session
            .inner
            .commit(stale, "const a = 1".into(), Outcome::Executed { program, memory });

        assert!(!committed);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.source, "const b = 2");
        assert_eq!(snapshot.generation, stale + 1);
        assert!(snapshot.memory.get("a").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_format() {
        let session = session();
        assert_eq!(session.format("const  a=1").unwrap(), "const a = 1\n");
        assert_eq!(session.format("const a = @").unwrap_err().kind, DiagnosticKind::Lexical);
    }
}
