//! Cleanup procedure: removes owned snapshots in scope.

use tracing::debug;

use super::CleanRequest;
use super::context::ExecutionContext;
use super::error::Halt;
use super::plan::select;
use crate::engine::Probe;
use crate::inventory::{LogicalVolume, VolumeKind};
use crate::runner::CommandRunner;
use crate::status::{Outcome, SnapshotStatus};

/// Removes every owned snapshot in scope, stopping at the first failure.
///
/// A named volume matches itself and the snapshot name derived from it, so
/// the selection used for `snapshot` also cleans what it created.
pub(super) fn execute<R: CommandRunner>(
    ctx: &mut ExecutionContext<'_, R>,
    request: &CleanRequest,
) -> Result<Outcome, Halt> {
    let inventory = ctx.engine().full_report()?;
    let naming = request.naming();
    let selections = select(&inventory, request.scope(), |selected, volume| {
        volume.name == naming.snapshot_name(selected)
    })?;

    let mut skipped = 0_usize;
    for volume in selections.iter().flat_map(|selection| selection.volumes.iter()) {
        if !naming.owns(&volume.name) {
            continue;
        }
        if !remove_one(ctx, volume)? {
            skipped += 1;
        }
    }

    if skipped > 0 {
        return Ok(Outcome::new(
            SnapshotStatus::RemoveFailedNotSnapshot,
            format!("{skipped} matching volume(s) are not snapshots and were kept"),
        ));
    }
    Ok(Outcome::ok())
}

/// Removes `volume` if it is still a snapshot, returning `false` when it was
/// kept because it is not one.
fn remove_one<R: CommandRunner>(
    ctx: &mut ExecutionContext<'_, R>,
    volume: &LogicalVolume,
) -> Result<bool, Halt> {
    let LogicalVolume { vg_name, name, .. } = volume;
    let engine = ctx.engine();

    match engine.probe(vg_name, name)? {
        Probe::Present(VolumeKind::Snapshot) => {}
        Probe::Present(kind) => {
            debug!(vg = %vg_name, lv = %name, ?kind, "name matches but volume is not a snapshot");
            ctx.record(
                vg_name,
                name,
                Outcome::new(
                    SnapshotStatus::RemoveFailedNotSnapshot,
                    format!("{vg_name}/{name} is not a snapshot"),
                ),
            );
            return Ok(false);
        }
        Probe::Absent => {
            return Err(Outcome::new(
                SnapshotStatus::EngineQueryFailed,
                format!("{vg_name}/{name} disappeared during the run"),
            )
            .into());
        }
    }

    let output = engine.remove(vg_name, name)?;
    if !output.is_success() {
        let outcome = Outcome::new(SnapshotStatus::RemoveFailed, output.message());
        ctx.record(vg_name, name, outcome.clone());
        return Err(outcome.into());
    }

    ctx.record(
        vg_name,
        name,
        Outcome::new(SnapshotStatus::Ok, format!("removed snapshot {name}")),
    );
    Ok(true)
}
