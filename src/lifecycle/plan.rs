//! Planning phase shared by `snapshot` and `check`: scope selection, name
//! pre-flight, and the per-group capacity check.

use tracing::{debug, info};

use super::SnapshotRequest;
use super::context::ExecutionContext;
use super::error::Halt;
use crate::capacity::{group_demand, snapshot_size};
use crate::inventory::{GroupInventory, Inventory, LogicalVolume, VolumeGroup};
use crate::naming::{MAX_LVM_NAME, SnapshotNaming};
use crate::runner::CommandRunner;
use crate::scope::Scope;
use crate::status::{Outcome, SnapshotStatus};

/// Scoped volumes of one group, in inventory order.
#[derive(Debug)]
pub(super) struct Selection<'i> {
    pub(super) entry: &'i GroupInventory,
    pub(super) volumes: Vec<&'i LogicalVolume>,
}

impl<'i> Selection<'i> {
    pub(super) const fn group(&self) -> &'i VolumeGroup {
        &self.entry.group
    }
}

/// Snapshot the execution phase will try to create.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct SnapshotCandidate {
    pub(super) vg_name: String,
    pub(super) source: String,
    pub(super) name: String,
    pub(super) size_bytes: u64,
}

/// Filters `inventory` to `scope`.
///
/// When the scope names a volume, that volume is selected along with any
/// volume for which `alias(selected, volume)` holds. A named group that is absent is
/// [`SnapshotStatus::VolumeGroupNotFound`]; deciding what an empty volume
/// match means is left to the caller.
pub(super) fn select<'i, F>(
    inventory: &'i Inventory,
    scope: &Scope,
    alias: F,
) -> Result<Vec<Selection<'i>>, Outcome>
where
    F: Fn(&str, &LogicalVolume) -> bool,
{
    let selections: Vec<_> = inventory
        .groups()
        .iter()
        .filter(|entry| scope.includes_group(&entry.group.name))
        .map(|entry| Selection {
            entry,
            volumes: entry
                .volumes
                .iter()
                .filter(|volume| {
                    scope.includes_volume(&volume.name)
                        || scope.lv_name().is_some_and(|selected| alias(selected, volume))
                })
                .collect(),
        })
        .collect();

    match scope.vg_name() {
        Some(vg_name) if inventory.group(vg_name).is_none() => Err(Outcome::new(
            SnapshotStatus::VolumeGroupNotFound,
            format!("volume group {vg_name} not found"),
        )),
        _ => Ok(selections),
    }
}

/// Runs planning steps one to four and returns the candidates in inventory
/// order.
pub(super) fn plan_snapshots<R: CommandRunner>(
    ctx: &ExecutionContext<'_, R>,
    request: &SnapshotRequest,
) -> Result<Vec<SnapshotCandidate>, Halt> {
    let inventory = ctx.engine().full_report()?;
    let scope = request.scope();
    let selections = select(&inventory, scope, |_, _| false)?;

    if let Scope::Volume { vg_name, lv_name } = scope {
        if selections.iter().all(|selection| selection.volumes.is_empty()) {
            return Err(Outcome::new(
                SnapshotStatus::VolumeNotFound,
                format!("logical volume {vg_name}/{lv_name} not found"),
            )
            .into());
        }
    }

    let naming = request.naming();
    check_names(&selections, naming)?;
    check_capacity(&selections, naming, request.percent())?;

    Ok(selections
        .iter()
        .flat_map(|selection| {
            sources(selection).map(|volume| SnapshotCandidate {
                vg_name: selection.group().name.clone(),
                source: volume.name.clone(),
                name: naming.snapshot_name(&volume.name),
                size_bytes: snapshot_size(request.percent(), volume.size_bytes),
            })
        })
        .collect())
}

/// Volumes of `selection` that may be snapshotted.
fn sources<'s, 'i>(selection: &'s Selection<'i>) -> impl Iterator<Item = &'i LogicalVolume> + 's {
    selection
        .volumes
        .iter()
        .copied()
        .filter(|volume| !volume.is_snapshot())
}

fn check_names(selections: &[Selection<'_>], naming: &SnapshotNaming) -> Result<(), Outcome> {
    for selection in selections {
        let vg_name = &selection.group().name;
        if let Some(volume) = sources(selection).find(|volume| !naming.fits(vg_name, &volume.name)) {
            return Err(Outcome::new(
                SnapshotStatus::NameTooLong,
                format!(
                    "snapshot name {} for {vg_name}/{} exceeds {MAX_LVM_NAME} characters",
                    naming.snapshot_name(&volume.name),
                    volume.name,
                ),
            ));
        }
    }
    Ok(())
}

/// Whole-group capacity check.
///
/// Sources whose snapshot already exists in the group are left out of the
/// demand so a repeated run does not ask for space it will not use.
fn check_capacity(
    selections: &[Selection<'_>],
    naming: &SnapshotNaming,
    percent: u8,
) -> Result<(), Outcome> {
    for selection in selections {
        let group = selection.group();
        let pending: Vec<_> = sources(selection)
            .filter(|volume| !has_snapshot(selection.entry, &naming.snapshot_name(&volume.name)))
            .collect();
        if pending.is_empty() {
            debug!(vg = %group.name, "no snapshots pending in group");
            continue;
        }

        let demand = group_demand(group, &pending, percent);
        info!(
            vg = %group.name,
            required_bytes = demand.required_bytes,
            free_bytes = demand.free_bytes,
            "space needed for snapshots"
        );
        if !demand.is_sufficient() {
            return Err(Outcome::new(
                SnapshotStatus::InsufficientSpace,
                format!(
                    "volume group {} needs {} bytes but has {} bytes free",
                    group.name, demand.required_bytes, demand.free_bytes
                ),
            ));
        }
    }
    Ok(())
}

fn has_snapshot(entry: &GroupInventory, name: &str) -> bool {
    entry
        .volumes
        .iter()
        .any(|volume| volume.name == name && volume.is_snapshot())
}
