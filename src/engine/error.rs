//! Error types for engine queries.

use thiserror::Error;

use crate::runner::RunnerError;

/// Responses that break the engine's own contract.
///
/// These are not ordinary failures of the requested operation: they mean the
/// engine is behaving inconsistently, so they propagate and end the
/// invocation instead of becoming a status.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineBug {
    /// A single-volume query matched more than one record.
    #[error("lvm bug encountered: '{command}' returned more than one record for {target}")]
    MultipleRecords {
        /// Engine command that produced the response.
        command: String,
        /// Object the query targeted.
        target: String,
    },
    /// A successful query returned no record at all.
    #[error("lvm bug encountered: '{command}' returned no record for {target}")]
    MissingRecord {
        /// Engine command that produced the response.
        command: String,
        /// Object the query targeted.
        target: String,
    },
    /// A volume was reported with an empty attribute string.
    #[error("lvm bug encountered: '{command}' returned a zero length attribute for {target}")]
    EmptyAttribute {
        /// Engine command that produced the response.
        command: String,
        /// Volume the attribute belongs to.
        target: String,
    },
    /// A volume group reported more free space than its total size.
    #[error("lvm bug encountered: volume group {vg_name} reports {free_bytes} bytes free of {size_bytes}")]
    FreeExceedsSize {
        /// Volume group name.
        vg_name: String,
        /// Reported total size.
        size_bytes: u64,
        /// Reported free space.
        free_bytes: u64,
    },
}

/// Errors raised while talking to the engine.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineError {
    /// A query exited with a non-zero status.
    #[error("'{command}' exited with status {status_text}: {message}")]
    CommandFailure {
        /// Engine command that failed.
        command: String,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Engine output explaining the failure.
        message: String,
    },
    /// A query's output was not the expected structured report.
    #[error("failed to parse '{command}' output: {message}")]
    Parse {
        /// Engine command whose output was malformed.
        command: String,
        /// Parser error message.
        message: String,
    },
    /// The engine contradicted its own contract.
    #[error(transparent)]
    Bug(#[from] EngineBug),
    /// The engine command could not be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}
