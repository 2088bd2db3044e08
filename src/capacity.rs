//! Space reservation arithmetic for snapshots.
//!
//! All sizes are in bytes. Products are computed in `u128` so a percentage of
//! any engine-reported size cannot overflow.

use crate::inventory::{LogicalVolume, VolumeGroup};

/// Allocation granularity the engine accepts for snapshot sizes.
pub const GRANULARITY: u64 = 512;

/// Exact share of `volume_size_bytes` reserved at `percent`, rounded up to a
/// whole byte.
#[must_use]
pub fn required_bytes(percent: u8, volume_size_bytes: u64) -> u64 {
    saturate(percent_of(percent, u128::from(volume_size_bytes)))
}

/// Rounds `required` up to the next multiple of `granularity`.
///
/// An exact multiple still moves up one step, so the result is always
/// strictly greater than `required` and never zero. A zero granularity is
/// treated as one. Sizes past `u64::MAX` clamp to the largest multiple that
/// still fits.
#[must_use]
pub fn reserved_size(required: u64, granularity: u64) -> u64 {
    let step = u128::from(granularity.max(1));
    let steps = u128::from(required).div_euclid(step).saturating_add(1);
    let ceiling = u128::from(u64::MAX).div_euclid(step).saturating_mul(step);
    saturate(steps.saturating_mul(step).min(ceiling))
}

/// Snapshot size to request for a source volume.
#[must_use]
pub fn snapshot_size(percent: u8, volume_size_bytes: u64) -> u64 {
    reserved_size(required_bytes(percent, volume_size_bytes), GRANULARITY)
}

/// Aggregate reservation demand for one volume group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GroupDemand {
    /// Bytes the reservation needs across all candidate volumes.
    pub required_bytes: u64,
    /// Bytes the group has free.
    pub free_bytes: u64,
}

impl GroupDemand {
    /// Returns `true` when the group can hold the reservation.
    #[must_use]
    pub const fn is_sufficient(&self) -> bool {
        self.free_bytes >= self.required_bytes
    }
}

/// Computes the whole-group demand for snapshotting `volumes` at `percent`.
///
/// The percentage applies to the summed size of the candidates, once per
/// group; space consumed by earlier snapshots in the same run is not
/// re-checked.
#[must_use]
pub fn group_demand(group: &VolumeGroup, volumes: &[&LogicalVolume], percent: u8) -> GroupDemand {
    let total = volumes
        .iter()
        .map(|volume| u128::from(volume.size_bytes))
        .fold(0_u128, u128::saturating_add);
    GroupDemand {
        required_bytes: saturate(percent_of(percent, total)),
        free_bytes: group.free_bytes,
    }
}

/// Whether `group` has room for snapshots of `volumes` at `percent`.
#[must_use]
pub fn check_group_capacity(group: &VolumeGroup, volumes: &[&LogicalVolume], percent: u8) -> bool {
    group_demand(group, volumes, percent).is_sufficient()
}

fn percent_of(percent: u8, bytes: u128) -> u128 {
    bytes.saturating_mul(u128::from(percent)).div_ceil(100)
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
