//! Core library for the `lvsnap` snapshot lifecycle tool.
//!
//! The crate wraps the LVM command-line tools behind a [`CommandRunner`]
//! capability and drives three verbs through a [`SnapshotController`]:
//! create snapshots for a scope of logical volumes, check that creation
//! would succeed, and remove the snapshots it previously created. Every
//! invocation re-reads the volume topology from the engine; no state is kept
//! between runs.

pub mod capacity;
pub mod config;
pub mod engine;
pub mod inventory;
pub mod lifecycle;
pub mod logging;
pub mod naming;
pub mod runner;
pub mod scope;
pub mod status;
pub mod test_support;

pub use capacity::{GRANULARITY, reserved_size, required_bytes};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineBug, EngineError, LvmEngine, Probe};
pub use inventory::{GroupInventory, Inventory, LogicalVolume, VolumeGroup, VolumeKind};
pub use lifecycle::{
    CleanRequest, ExecutionContext, LifecycleError, Report, RequestError, SnapshotController,
    SnapshotRequest,
};
pub use naming::{MAX_LVM_NAME, SnapshotNaming};
pub use runner::{CommandOutput, CommandRunner, ProcessCommandRunner, RunnerError};
pub use scope::{Scope, ScopeError};
pub use status::{Outcome, SnapshotStatus, VolumeOutcome};
