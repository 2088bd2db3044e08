//! Behavioural tests for argument handling in the `lvsnap` CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use rstest::rstest;

/// Engine path that cannot be spawned, so any engine call is visible.
const MISSING_LVM: &str = "/nonexistent/lvsnap-test/lvm";

fn lvsnap() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lvsnap");
    cmd.env("LVSNAP_LVM_BIN", MISSING_LVM);
    cmd.env("LVSNAP_LOG", "off");
    cmd
}

#[test]
fn help_lists_every_verb() {
    lvsnap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("snapshot").and(contains("check")).and(contains("clean")));
}

#[test]
fn missing_verb_prints_usage_and_fails() {
    lvsnap().assert().failure().code(1).stderr(contains("Usage"));
}

#[rstest]
#[case(&["snapshot", "--all", "--vg", "vg0", "-p", "snap_"], "mutually exclusive")]
#[case(&["check", "-a", "--volume-group", "vg0", "-s", "_bak"], "mutually exclusive")]
#[case(&["clean", "-p", "snap_"], "must specify either --all or a volume group")]
#[case(&["snapshot", "--lv", "data", "-p", "snap_"], "--logical-volume requires --volume-group")]
fn selection_errors_exit_one_before_any_engine_call(
    #[case] args: &[&str],
    #[case] expected: &str,
) {
    lvsnap()
        .args(args)
        .assert()
        .failure()
        .code(1)
        .stderr(contains(expected).and(contains("failed to spawn").not()));
}

#[rstest]
#[case("9")]
#[case("100")]
fn percent_outside_range_is_a_usage_error(#[case] percent: &str) {
    lvsnap()
        .args(["snapshot", "-a", "-p", "snap_", "-r", percent])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("failed to spawn").not());
}

#[test]
fn empty_prefix_and_suffix_are_rejected() {
    lvsnap()
        .args(["clean", "--all"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("a snapshot prefix or suffix is required"));
}

#[test]
fn unstartable_engine_is_reported() {
    lvsnap()
        .args(["check", "--all", "-p", "snap_"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains(format!("failed to spawn {MISSING_LVM}")));
}
