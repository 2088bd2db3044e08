//! Snapshot lifecycle controller behind the `snapshot`, `check`, and `clean`
//! verbs.
//!
//! Every verb starts from a fresh engine report. `snapshot` and `check` share
//! a planning phase (scope, name length, group capacity) that completes
//! before anything is mutated; `snapshot` then probes and creates volume by
//! volume, treating existing snapshots as done. `clean` removes only volumes
//! that both match the naming pattern and are confirmed snapshots.

use tracing::info;

use crate::config::{ConfigError, EngineConfig};
use crate::engine::LvmEngine;
use crate::naming::SnapshotNaming;
use crate::runner::{CommandRunner, ProcessCommandRunner};
use crate::scope::Scope;
use crate::status::{Outcome, VolumeOutcome};

mod clean;
mod context;
mod create;
mod error;
mod plan;

pub use context::ExecutionContext;
pub use error::{LifecycleError, RequestError};
use error::Halt;

/// Smallest accepted reservation percentage.
pub const MIN_PERCENT: u8 = 10;
/// Largest accepted reservation percentage.
pub const MAX_PERCENT: u8 = 99;
/// Reservation percentage used when none is given.
pub const DEFAULT_PERCENT: u8 = 20;

/// Inputs for `snapshot` and `check`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotRequest {
    scope: Scope,
    naming: SnapshotNaming,
    percent: u8,
}

impl SnapshotRequest {
    /// Builds a validated snapshot request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::PercentOutOfRange`] when `percent` is outside
    /// `10..=99`, and [`RequestError::EmptyAffixes`] when the naming policy
    /// has neither prefix nor suffix.
    pub fn new(scope: Scope, naming: SnapshotNaming, percent: u8) -> Result<Self, RequestError> {
        if !(MIN_PERCENT..=MAX_PERCENT).contains(&percent) {
            return Err(RequestError::PercentOutOfRange { percent });
        }
        require_affixes(&naming)?;
        Ok(Self {
            scope,
            naming,
            percent,
        })
    }

    /// Volumes the request covers.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Snapshot naming policy.
    #[must_use]
    pub const fn naming(&self) -> &SnapshotNaming {
        &self.naming
    }

    /// Share of each source volume reserved for its snapshot.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }
}

/// Inputs for `clean`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CleanRequest {
    scope: Scope,
    naming: SnapshotNaming,
}

impl CleanRequest {
    /// Builds a validated cleanup request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::EmptyAffixes`] when the naming policy has
    /// neither prefix nor suffix.
    pub fn new(scope: Scope, naming: SnapshotNaming) -> Result<Self, RequestError> {
        require_affixes(&naming)?;
        Ok(Self { scope, naming })
    }

    /// Volumes the request covers.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Naming policy identifying owned snapshots.
    #[must_use]
    pub const fn naming(&self) -> &SnapshotNaming {
        &self.naming
    }
}

fn require_affixes(naming: &SnapshotNaming) -> Result<(), RequestError> {
    if naming.is_empty() {
        return Err(RequestError::EmptyAffixes);
    }
    Ok(())
}

/// Result of one verb: the batch outcome plus every per-volume entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    /// Batch outcome.
    pub outcome: Outcome,
    /// Per-volume entries in the order they were recorded.
    pub entries: Vec<VolumeOutcome>,
}

impl Report {
    /// Returns `true` when the batch outcome is a success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Drives the lifecycle verbs through an [`LvmEngine`].
#[derive(Clone, Debug)]
pub struct SnapshotController<R: CommandRunner> {
    engine: LvmEngine<R>,
}

impl SnapshotController<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when validation fails.
    pub fn with_process_runner(config: EngineConfig) -> Result<Self, ConfigError> {
        LvmEngine::with_process_runner(config).map(Self::new)
    }
}

impl<R: CommandRunner> SnapshotController<R> {
    /// Creates a controller around `engine`.
    #[must_use]
    pub const fn new(engine: LvmEngine<R>) -> Self {
        Self { engine }
    }

    /// Engine collaborator.
    #[must_use]
    pub const fn engine(&self) -> &LvmEngine<R> {
        &self.engine
    }

    /// Creates the snapshots `request` describes.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when the engine breaks its contract or
    /// cannot be started; every other failure is reported in the
    /// [`Report`].
    pub fn snapshot(&self, request: &SnapshotRequest) -> Result<Report, LifecycleError> {
        self.run("snapshot", |ctx| create::execute(ctx, request))
    }

    /// Runs the planning phase of `snapshot` without creating anything.
    ///
    /// Name conflicts are only detected when snapshots are created, so a
    /// passing check does not rule them out.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when the engine breaks its contract or
    /// cannot be started.
    pub fn check(&self, request: &SnapshotRequest) -> Result<Report, LifecycleError> {
        self.run("check", |ctx| create::check(ctx, request))
    }

    /// Removes the owned snapshots `request` describes.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when the engine breaks its contract or
    /// cannot be started.
    pub fn clean(&self, request: &CleanRequest) -> Result<Report, LifecycleError> {
        self.run("clean", |ctx| clean::execute(ctx, request))
    }

    fn run<F>(&self, verb: &str, body: F) -> Result<Report, LifecycleError>
    where
        F: FnOnce(&mut ExecutionContext<'_, R>) -> Result<Outcome, Halt>,
    {
        let mut ctx = ExecutionContext::new(&self.engine);
        let outcome = match body(&mut ctx) {
            Ok(outcome) | Err(Halt::Stop(outcome)) => outcome,
            Err(Halt::Fatal(err)) => return Err(err),
        };
        info!(verb, status = %outcome.status, code = outcome.status.code(), "{verb} finished");
        Ok(Report {
            outcome,
            entries: ctx.into_log(),
        })
    }
}
