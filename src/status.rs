//! Closed outcome taxonomy shared by the snapshot, check, and clean verbs.

use std::fmt;

/// Every distinguishable result of a lifecycle operation.
///
/// The numeric codes are stable and double as the process exit status for
/// failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SnapshotStatus {
    /// The operation completed.
    Ok,
    /// A volume group lacks the free capacity the reservation needs.
    InsufficientSpace,
    /// Nothing was left to do: every snapshot in scope already exists.
    AlreadyDone,
    /// The engine refused to create a snapshot.
    SnapshotCreateFailed,
    /// The engine refused to remove a snapshot.
    RemoveFailed,
    /// A volume matched the naming pattern but is not a snapshot.
    RemoveFailedNotSnapshot,
    /// The engine could not report the volume topology.
    EngineQueryFailed,
    /// A derived snapshot name would exceed the engine's identifier limit.
    NameTooLong,
    /// A snapshot with the derived name already exists.
    AlreadyExists,
    /// The derived name is taken by a volume that is not a snapshot.
    NameConflict,
    /// The selected volume group does not exist.
    VolumeGroupNotFound,
    /// The selected logical volume does not exist.
    VolumeNotFound,
}

impl SnapshotStatus {
    /// Numeric status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::InsufficientSpace => 1,
            Self::AlreadyDone => 2,
            Self::SnapshotCreateFailed => 3,
            Self::RemoveFailed => 4,
            Self::RemoveFailedNotSnapshot => 5,
            Self::EngineQueryFailed => 6,
            Self::NameTooLong => 7,
            Self::AlreadyExists => 8,
            Self::NameConflict => 9,
            Self::VolumeGroupNotFound => 10,
            Self::VolumeNotFound => 11,
        }
    }

    /// Returns `true` for statuses that mean the requested state was reached.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::AlreadyDone)
    }

    /// Stable, human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InsufficientSpace => "insufficient space",
            Self::AlreadyDone => "already done",
            Self::SnapshotCreateFailed => "snapshot create failed",
            Self::RemoveFailed => "remove failed",
            Self::RemoveFailedNotSnapshot => "remove failed: not a snapshot",
            Self::EngineQueryFailed => "engine query failed",
            Self::NameTooLong => "name too long",
            Self::AlreadyExists => "already exists",
            Self::NameConflict => "name conflict",
            Self::VolumeGroupNotFound => "volume group not found",
            Self::VolumeNotFound => "volume not found",
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status plus human readable message, produced when an operation concludes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    /// Result classification.
    pub status: SnapshotStatus,
    /// Human readable detail; empty for plain success.
    pub message: String,
}

impl Outcome {
    /// Successful outcome without detail.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: SnapshotStatus::Ok,
            message: String::new(),
        }
    }

    /// Outcome with the given status and message.
    #[must_use]
    pub fn new(status: SnapshotStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` when the status is a success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} ({})", self.status, self.status.code())
        } else {
            write!(
                f,
                "{} ({}): {}",
                self.status,
                self.status.code(),
                self.message
            )
        }
    }
}

/// Per-volume entry appended to the outcome log during execution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeOutcome {
    /// Volume group holding the volume.
    pub vg_name: String,
    /// Logical volume the entry refers to.
    pub lv_name: String,
    /// What happened to it.
    pub outcome: Outcome,
}

impl fmt::Display for VolumeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.vg_name, self.lv_name, self.outcome)
    }
}
