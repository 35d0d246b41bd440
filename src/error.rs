// File: ./src/error.rs
//! Error kinds for schedule loading and task submission.

use std::fmt;
use thiserror::Error;

/// Which lookup table a dangling reference pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Subject,
    Generator,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Subject => write!(f, "subject"),
            ReferenceKind::Generator => write!(f, "generator"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Broken calendar window or curriculum data. Fatal: nothing is committed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A task definition named a subject or generator that was never defined.
    /// Fatal at load time, before scheduling begins.
    #[error("unknown {kind} reference '{name}'")]
    UnknownReference { kind: ReferenceKind, name: String },

    /// The external service rejected a task. Recoverable: the failed task's
    /// subtree is abandoned and sibling trees continue.
    #[error("submission failed: {0}")]
    Submission(String),

    /// A data file could not be read or deserialized.
    #[error("could not parse {path}: {message}")]
    Parse { path: String, message: String },
}
