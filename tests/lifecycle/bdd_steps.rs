//! BDD step definitions for the lifecycle verbs.

use lvsnap::SnapshotNaming;
use lvsnap::test_support::FakeVolume;
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{LifecycleContext, Verb, group_scope, volume_scope};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn add_volume(context: &LifecycleContext, vg: &str, volume: FakeVolume) {
    if !context.simulator.add_volume(vg, volume) {
        panic!("test setup requires volume group {vg}");
    }
}

#[given("a volume group \"{vg}\" with {free:u64} bytes free")]
fn volume_group(lifecycle_context: LifecycleContext, vg: String, free: u64) -> LifecycleContext {
    lifecycle_context.simulator.add_group(vg.trim(), free);
    lifecycle_context
}

#[given("volume group \"{vg}\" holds a regular volume \"{lv}\" of {size:u64} bytes")]
fn regular_volume(
    lifecycle_context: LifecycleContext,
    vg: String,
    lv: String,
    size: u64,
) -> LifecycleContext {
    add_volume(&lifecycle_context, vg.trim(), FakeVolume::regular(lv.trim(), size));
    lifecycle_context
}

#[given("volume group \"{vg}\" holds a regular volume named with {length:usize} characters")]
fn long_named_volume(
    lifecycle_context: LifecycleContext,
    vg: String,
    length: usize,
) -> LifecycleContext {
    add_volume(
        &lifecycle_context,
        vg.trim(),
        FakeVolume::regular(&"v".repeat(length), 1_000),
    );
    lifecycle_context
}

#[given("volume group \"{vg}\" holds a snapshot \"{name}\" of \"{origin}\"")]
fn existing_snapshot(
    lifecycle_context: LifecycleContext,
    vg: String,
    name: String,
    origin: String,
) -> LifecycleContext {
    add_volume(
        &lifecycle_context,
        vg.trim(),
        FakeVolume::snapshot(name.trim(), origin.trim(), 512),
    );
    lifecycle_context
}

#[given("snapshots are named with prefix \"{prefix}\" and suffix \"{suffix}\"")]
fn naming(mut lifecycle_context: LifecycleContext, prefix: String, suffix: String) -> LifecycleContext {
    lifecycle_context.naming = SnapshotNaming::new(prefix, suffix);
    lifecycle_context
}

#[given("the reservation is {percent:u8} percent")]
fn reservation(mut lifecycle_context: LifecycleContext, percent: u8) -> LifecycleContext {
    lifecycle_context.percent = percent;
    lifecycle_context
}

#[when("I snapshot volume group \"{vg}\"")]
fn snapshot_group(lifecycle_context: LifecycleContext, vg: String) -> LifecycleContext {
    lifecycle_context.run(Verb::Snapshot, group_scope(vg.trim()))
}

#[when("I snapshot volume \"{lv}\" in volume group \"{vg}\"")]
fn snapshot_volume(lifecycle_context: LifecycleContext, lv: String, vg: String) -> LifecycleContext {
    lifecycle_context.run(Verb::Snapshot, volume_scope(vg.trim(), lv.trim()))
}

#[when("I check volume group \"{vg}\"")]
fn check_group(lifecycle_context: LifecycleContext, vg: String) -> LifecycleContext {
    lifecycle_context.run(Verb::Check, group_scope(vg.trim()))
}

#[when("I clean volume group \"{vg}\"")]
fn clean_group(lifecycle_context: LifecycleContext, vg: String) -> LifecycleContext {
    lifecycle_context.run(Verb::Clean, group_scope(vg.trim()))
}

#[when("I clean volume \"{lv}\" in volume group \"{vg}\"")]
fn clean_volume(lifecycle_context: LifecycleContext, lv: String, vg: String) -> LifecycleContext {
    lifecycle_context.run(Verb::Clean, volume_scope(vg.trim(), lv.trim()))
}

#[then("the outcome is \"{label}\"")]
fn outcome_is(lifecycle_context: &LifecycleContext, label: String) -> Result<(), StepError> {
    let report = lifecycle_context.report().map_err(StepError::Assertion)?;
    let actual = report.outcome.status.label();
    if actual == label.trim() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected outcome {label}, got {}",
            report.outcome
        )))
    }
}

#[then("the exit code is {code:i32}")]
fn exit_code_is(lifecycle_context: &LifecycleContext, code: i32) -> Result<(), StepError> {
    let report = lifecycle_context.report().map_err(StepError::Assertion)?;
    let actual = if report.is_success() {
        0
    } else {
        report.outcome.status.code()
    };
    if actual == code {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected exit code {code}, got {actual} ({})",
            report.outcome
        )))
    }
}

#[then("{count:usize} snapshot create was issued")]
fn creates_issued(lifecycle_context: &LifecycleContext, count: usize) -> Result<(), StepError> {
    let actual = lifecycle_context.simulator.create_calls();
    if actual == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} lvcreate calls, got {actual}"
        )))
    }
}

#[then("{count:usize} snapshot removal was issued")]
fn removals_issued(lifecycle_context: &LifecycleContext, count: usize) -> Result<(), StepError> {
    let actual = lifecycle_context.simulator.remove_calls();
    if actual == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} lvremove calls, got {actual}"
        )))
    }
}

#[then("the snapshot \"{name}\" in volume group \"{vg}\" reserves {bytes:u64} bytes")]
fn snapshot_reserves(
    lifecycle_context: &LifecycleContext,
    name: String,
    vg: String,
    bytes: u64,
) -> Result<(), StepError> {
    let volumes = lifecycle_context
        .simulator
        .volumes(vg.trim())
        .ok_or_else(|| StepError::Assertion(format!("missing volume group {vg}")))?;
    let snapshot = volumes
        .iter()
        .find(|volume| volume.name == name.trim())
        .ok_or_else(|| StepError::Assertion(format!("missing snapshot {name}")))?;
    if snapshot.size_bytes == bytes && snapshot.origin.is_some() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a {bytes} byte snapshot, got {snapshot:?}"
        )))
    }
}

#[then("volume group \"{vg}\" still holds \"{name}\"")]
fn still_holds(
    lifecycle_context: &LifecycleContext,
    vg: String,
    name: String,
) -> Result<(), StepError> {
    if holds(lifecycle_context, vg.trim(), name.trim()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("{vg}/{name} was removed")))
    }
}

#[then("volume group \"{vg}\" no longer holds \"{name}\"")]
fn no_longer_holds(
    lifecycle_context: &LifecycleContext,
    vg: String,
    name: String,
) -> Result<(), StepError> {
    if holds(lifecycle_context, vg.trim(), name.trim()) {
        Err(StepError::Assertion(format!("{vg}/{name} is still present")))
    } else {
        Ok(())
    }
}

fn holds(lifecycle_context: &LifecycleContext, vg: &str, name: &str) -> bool {
    lifecycle_context
        .simulator
        .volumes(vg)
        .is_some_and(|volumes| volumes.iter().any(|volume| volume.name == name))
}
