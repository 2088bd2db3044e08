//! Error types for the snapshot lifecycle.

use thiserror::Error;

use crate::engine::{EngineBug, EngineError};
use crate::runner::RunnerError;
use crate::status::{Outcome, SnapshotStatus};

/// Errors raised while building a lifecycle request.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RequestError {
    /// Raised when the reservation percentage is outside `10..=99`.
    #[error("reservation percentage must be between 10 and 99, got {percent}")]
    PercentOutOfRange {
        /// Rejected percentage.
        percent: u8,
    },
    /// Raised when neither a prefix nor a suffix is configured.
    #[error("a snapshot prefix or suffix is required")]
    EmptyAffixes,
}

/// Conditions that end an invocation without producing an outcome.
///
/// Ordinary failures are reported as [`Outcome`] values; these are reserved
/// for an engine that breaks its own contract or cannot be started at all.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LifecycleError {
    /// Raised when the engine contradicts its documented behaviour.
    #[error(transparent)]
    Bug(#[from] EngineBug),
    /// Raised when an engine command cannot be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Why a lifecycle procedure stopped early.
#[derive(Debug)]
pub(super) enum Halt {
    /// The batch ends with this outcome.
    Stop(Outcome),
    /// The invocation terminates with an error.
    Fatal(LifecycleError),
}

impl From<Outcome> for Halt {
    fn from(outcome: Outcome) -> Self {
        Self::Stop(outcome)
    }
}

impl From<EngineError> for Halt {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Bug(bug) => Self::Fatal(bug.into()),
            EngineError::Runner(runner) => Self::Fatal(runner.into()),
            EngineError::CommandFailure { .. } | EngineError::Parse { .. } => Self::Stop(
                Outcome::new(SnapshotStatus::EngineQueryFailed, err.to_string()),
            ),
        }
    }
}
