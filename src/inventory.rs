//! In-memory view of the volume topology reported by the engine.
//!
//! An [`Inventory`] is rebuilt from a fresh engine query on every invocation
//! and is never carried across operations.

use camino::Utf8PathBuf;

/// Attribute character marking a snapshot.
const SNAPSHOT_ATTR: char = 's';
/// Attribute character marking an invalid (dropped) snapshot.
const INVALID_SNAPSHOT_ATTR: char = 'S';
/// Attribute character marking a plain volume.
const REGULAR_ATTR: char = '-';

/// Volume type encoded in the first character of the engine's attribute
/// string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VolumeKind {
    /// A copy-on-write snapshot of an origin volume.
    Snapshot,
    /// A plain linear or striped volume.
    Regular,
    /// Anything else (thin volumes, pools, mirrors, origins, ...).
    Other,
}

impl VolumeKind {
    /// Classifies an attribute string, returning `None` when it is empty.
    #[must_use]
    pub fn from_attr(attr: &str) -> Option<Self> {
        let first = attr.chars().next()?;
        Some(match first {
            SNAPSHOT_ATTR | INVALID_SNAPSHOT_ATTR => Self::Snapshot,
            REGULAR_ATTR => Self::Regular,
            _ => Self::Other,
        })
    }
}

/// Pool of storage capacity containing logical volumes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeGroup {
    /// Volume group name.
    pub name: String,
    /// Identifier that stays stable for the lifetime of the group.
    pub uuid: String,
    /// Total capacity in bytes.
    pub size_bytes: u64,
    /// Unallocated capacity in bytes; never larger than `size_bytes`.
    pub free_bytes: u64,
}

/// Allocatable unit of storage inside a volume group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogicalVolume {
    /// Logical volume name.
    pub name: String,
    /// Name of the owning volume group.
    pub vg_name: String,
    /// Device path, when the engine reports one.
    pub path: Option<Utf8PathBuf>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Raw attribute string; the first character encodes the type.
    pub attr: String,
    /// Volume this one is a snapshot of.
    pub origin: Option<String>,
    /// Thin pool backing this volume.
    pub pool: Option<String>,
}

impl LogicalVolume {
    /// Volume type from the attribute string.
    #[must_use]
    pub fn kind(&self) -> VolumeKind {
        VolumeKind::from_attr(&self.attr).unwrap_or(VolumeKind::Other)
    }

    /// Returns `true` when the volume is a snapshot.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.kind() == VolumeKind::Snapshot
    }
}

/// A volume group together with the volumes it holds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupInventory {
    /// The group itself.
    pub group: VolumeGroup,
    /// Volumes in engine report order.
    pub volumes: Vec<LogicalVolume>,
}

/// Ordered topology snapshot taken from a single engine report.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Inventory {
    groups: Vec<GroupInventory>,
}

impl Inventory {
    /// Wraps groups in engine report order.
    #[must_use]
    pub const fn new(groups: Vec<GroupInventory>) -> Self {
        Self { groups }
    }

    /// Groups in engine report order.
    #[must_use]
    pub fn groups(&self) -> &[GroupInventory] {
        &self.groups
    }

    /// Looks up a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupInventory> {
        self.groups.iter().find(|entry| entry.group.name == name)
    }
}
