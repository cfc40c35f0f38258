//! # Snapshots
//!
//! Immutable views of the session state published after every committed run.

use kcl_eval::ProgramMemory;
use kcl_parser::{Diagnostic, Program, Span};

/// Session state after one committed run.
///
/// - `source`: text that was run
/// - `program`: last program that parsed; kept when the source fails to lex
///   or parse
/// - `program_source`: text `program` was parsed from; its spans index this,
///   not `source`
/// - `memory`: last memory that executed without error
/// - `diagnostic`: the failure of the run that produced this snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub source: String,
    pub program: Option<Program>,
    pub program_source: String,
    pub memory: ProgramMemory,
    pub diagnostic: Option<Diagnostic>,
    /// Token of the run that produced this snapshot; 0 before any run.
    pub generation: u64,
}

impl Snapshot {
    /// `true` when the latest run succeeded.
    pub fn is_ok(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Result of one pipeline run, before it is folded into a snapshot.
#[derive(Debug)]
pub(crate) enum Outcome {
    Executed {
        program: Program,
        memory: ProgramMemory,
    },
    /// Lexing or parsing failed.
    Rejected(Diagnostic),
    /// Parsing succeeded, execution failed.
    Failed {
        program: Program,
        diagnostic: Diagnostic,
    },
}

impl Outcome {
    /// Builds the next snapshot, carrying forward what a failure leaves intact.
    pub(crate) fn into_snapshot(self, previous: &Snapshot, source: String, generation: u64) -> Snapshot {
        match self {
            Outcome::Executed { program, memory } => Snapshot {
                program_source: source.clone(),
                source,
                program: Some(program),
                memory,
                diagnostic: None,
                generation,
            },
            Outcome::Rejected(diagnostic) => Snapshot {
                source,
                program: previous.program.clone(),
                program_source: previous.program_source.clone(),
                memory: previous.memory.clone(),
                diagnostic: Some(diagnostic),
                generation,
            },
            Outcome::Failed {
                program,
                diagnostic,
            } => Snapshot {
                program_source: source.clone(),
                source,
                program: Some(program),
                memory: previous.memory.clone(),
                diagnostic: Some(diagnostic),
                generation,
            },
        }
    }
}

/// Result of writing an edited tree back to text.
#[derive(Debug, Clone, PartialEq)]
pub struct AstUpdate {
    /// Canonical text of the edited tree.
    pub source: String,
    /// The text re-parsed, with spans matching `source`.
    pub program: Program,
    /// Range of the focused node in the new text, if the path still resolves.
    pub focus: Option<Span>,
}
