//! Per-invocation execution state.

use tracing::{info, warn};

use crate::engine::LvmEngine;
use crate::runner::CommandRunner;
use crate::status::{Outcome, SnapshotStatus, VolumeOutcome};

/// Collaborators and append-only outcome log for one invocation.
///
/// Built fresh by the controller for every verb and consumed when the report
/// is assembled; nothing outlives the invocation.
#[derive(Debug)]
pub struct ExecutionContext<'e, R: CommandRunner> {
    engine: &'e LvmEngine<R>,
    log: Vec<VolumeOutcome>,
}

impl<'e, R: CommandRunner> ExecutionContext<'e, R> {
    /// Creates a context with an empty outcome log.
    #[must_use]
    pub const fn new(engine: &'e LvmEngine<R>) -> Self {
        Self {
            engine,
            log: Vec::new(),
        }
    }

    /// Engine collaborator.
    #[must_use]
    pub const fn engine(&self) -> &'e LvmEngine<R> {
        self.engine
    }

    /// Appends an entry for `vg_name/lv_name`.
    pub fn record(&mut self, vg_name: &str, lv_name: &str, outcome: Outcome) {
        let entry = VolumeOutcome {
            vg_name: vg_name.to_owned(),
            lv_name: lv_name.to_owned(),
            outcome,
        };
        match entry.outcome.status {
            SnapshotStatus::Ok | SnapshotStatus::AlreadyExists => info!("{entry}"),
            _ => warn!("{entry}"),
        }
        self.log.push(entry);
    }

    /// Consumes the context, returning the outcome log.
    #[must_use]
    pub fn into_log(self) -> Vec<VolumeOutcome> {
        self.log
    }
}
