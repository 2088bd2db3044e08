//! Execution phase of the `snapshot` verb.

use tracing::{debug, info};

use super::SnapshotRequest;
use super::context::ExecutionContext;
use super::error::Halt;
use super::plan::{SnapshotCandidate, plan_snapshots};
use crate::engine::Probe;
use crate::inventory::VolumeKind;
use crate::runner::CommandRunner;
use crate::status::{Outcome, SnapshotStatus};

/// Tally of per-volume results used to summarise the batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Tally {
    created: usize,
    existing: usize,
    conflicts: usize,
}

impl Tally {
    fn summary(self) -> Outcome {
        if self.conflicts > 0 {
            Outcome::new(
                SnapshotStatus::NameConflict,
                format!(
                    "{} snapshot name(s) already used by volumes that are not snapshots",
                    self.conflicts
                ),
            )
        } else if self.created == 0 && self.existing > 0 {
            Outcome::new(
                SnapshotStatus::AlreadyDone,
                format!("{} snapshot(s) already exist", self.existing),
            )
        } else {
            Outcome::ok()
        }
    }
}

/// Verifies the batch would succeed without creating anything.
pub(super) fn check<R: CommandRunner>(
    ctx: &ExecutionContext<'_, R>,
    request: &SnapshotRequest,
) -> Result<Outcome, Halt> {
    let candidates = plan_snapshots(ctx, request)?;
    info!(candidates = candidates.len(), "snapshot check passed");
    Ok(Outcome::ok())
}

/// Plans the batch, then creates each missing snapshot in inventory order.
pub(super) fn execute<R: CommandRunner>(
    ctx: &mut ExecutionContext<'_, R>,
    request: &SnapshotRequest,
) -> Result<Outcome, Halt> {
    let candidates = plan_snapshots(ctx, request)?;
    let mut tally = Tally::default();
    for candidate in &candidates {
        create_one(ctx, candidate, &mut tally)?;
    }
    Ok(tally.summary())
}

fn create_one<R: CommandRunner>(
    ctx: &mut ExecutionContext<'_, R>,
    candidate: &SnapshotCandidate,
    tally: &mut Tally,
) -> Result<(), Halt> {
    let SnapshotCandidate {
        vg_name,
        source,
        name,
        size_bytes,
    } = candidate;
    let engine = ctx.engine();

    match engine.probe(vg_name, source)? {
        Probe::Present(VolumeKind::Snapshot) => {
            debug!(vg = %vg_name, lv = %source, "skipping snapshot source");
            return Ok(());
        }
        Probe::Present(_) => {}
        Probe::Absent => {
            return Err(Outcome::new(
                SnapshotStatus::EngineQueryFailed,
                format!("source volume {vg_name}/{source} disappeared during the run"),
            )
            .into());
        }
    }

    match engine.probe(vg_name, name)? {
        Probe::Present(VolumeKind::Snapshot) => {
            tally.existing += 1;
            ctx.record(
                vg_name,
                source,
                Outcome::new(
                    SnapshotStatus::AlreadyExists,
                    format!("snapshot {name} already exists"),
                ),
            );
            return Ok(());
        }
        Probe::Present(_) => {
            tally.conflicts += 1;
            ctx.record(
                vg_name,
                source,
                Outcome::new(
                    SnapshotStatus::NameConflict,
                    format!("{vg_name}/{name} exists and is not a snapshot"),
                ),
            );
            return Ok(());
        }
        Probe::Absent => {}
    }

    let output = engine.create_snapshot(vg_name, source, name, *size_bytes)?;
    if !output.is_success() {
        let outcome = Outcome::new(SnapshotStatus::SnapshotCreateFailed, output.message());
        ctx.record(vg_name, source, outcome.clone());
        return Err(outcome.into());
    }

    tally.created += 1;
    ctx.record(
        vg_name,
        source,
        Outcome::new(
            SnapshotStatus::Ok,
            format!("created snapshot {name} reserving {size_bytes} bytes"),
        ),
    );
    Ok(())
}
