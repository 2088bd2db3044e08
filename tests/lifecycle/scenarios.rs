//! BDD scenarios for the lifecycle verbs.

use rstest_bdd_macros::scenario;

use super::test_helpers::{LifecycleContext, lifecycle_context};

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Create a snapshot with a rounded reservation"
)]
fn scenario_create_snapshot(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Repeating a snapshot run is idempotent"
)]
fn scenario_repeat_snapshot(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Refuse to snapshot when the group lacks space"
)]
fn scenario_insufficient_space(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Reject the whole batch when one name is too long"
)]
fn scenario_name_too_long(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Report a snapshot name taken by a regular volume"
)]
fn scenario_name_conflict(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Check plans without creating"
)]
fn scenario_check(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/snapshot.feature",
    name = "Report a missing volume group"
)]
fn scenario_missing_group(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/clean.feature",
    name = "Remove snapshots created by an earlier run"
)]
fn scenario_clean_after_snapshot(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/clean.feature",
    name = "Keep a matching volume that is not a snapshot"
)]
fn scenario_clean_keeps_non_snapshot(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/clean.feature",
    name = "Clean the snapshot derived from a named volume"
)]
fn scenario_clean_named_volume(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}
