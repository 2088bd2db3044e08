//! Unit tests for the engine wrapper.

use super::*;
use crate::inventory::VolumeKind;
use crate::test_support::{
    FakeGroup, FakeVolume, ScriptedRunner, SNAPSHOT_ATTR, THIN_ATTR, json_full_report, json_probe,
};
use rstest::{fixture, rstest};

#[fixture]
fn runner() -> ScriptedRunner {
    ScriptedRunner::new()
}

fn engine(runner: &ScriptedRunner) -> LvmEngine<ScriptedRunner> {
    LvmEngine::new(EngineConfig::default(), runner.clone()).expect("default config is valid")
}

fn args_of(runner: &ScriptedRunner) -> Vec<String> {
    runner
        .invocations()
        .last()
        .map(|call| {
            call.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
fn blank_binary_is_rejected() {
    let config = EngineConfig {
        lvcreate_bin: String::from("  "),
        ..EngineConfig::default()
    };
    let err = LvmEngine::new(config, ScriptedRunner::new()).expect_err("blank binary");
    assert!(matches!(err, ConfigError::MissingField(ref field) if field.contains("lvcreate_bin")));
}

#[rstest]
fn full_report_normalises_groups_and_volumes(runner: ScriptedRunner) {
    runner.push_stdout(json_full_report(&[
        FakeGroup::new(
            "vg0",
            4_096,
            vec![
                FakeVolume::regular("data", 1_000_000),
                FakeVolume::snapshot("snap_data", "data", 200_192),
            ],
        ),
        FakeGroup::new("vg1", 0, vec![]),
    ]));

    let inventory = engine(&runner).full_report().expect("report should parse");

    assert_eq!(inventory.groups().len(), 2);
    let vg0 = inventory.group("vg0").expect("vg0 present");
    assert_eq!(vg0.group.free_bytes, 4_096);
    assert_eq!(vg0.group.size_bytes, 1_204_288);
    let names: Vec<_> = vg0.volumes.iter().map(|lv| lv.name.as_str()).collect();
    assert_eq!(names, ["data", "snap_data"]);
    assert!(!vg0.volumes.iter().any(|lv| lv.vg_name != "vg0"));
    let snapshot = vg0.volumes.last().expect("snapshot volume");
    assert!(snapshot.is_snapshot());
    assert_eq!(snapshot.origin.as_deref(), Some("data"));
    assert_eq!(
        snapshot.path.as_deref().map(camino::Utf8Path::as_str),
        Some("/dev/vg0/snap_data")
    );
    assert!(inventory.group("vg1").is_some_and(|g| g.volumes.is_empty()));
}

#[rstest]
fn full_report_uses_lvm_binary_and_json_format(runner: ScriptedRunner) {
    runner.push_stdout(json_full_report(&[]));
    let inventory = engine(&runner).full_report().expect("report should parse");
    assert!(inventory.groups().is_empty());

    assert_eq!(runner.calls_to("lvm"), 1);
    let args = args_of(&runner);
    assert_eq!(args.first().map(String::as_str), Some("fullreport"));
    assert!(args.windows(2).any(|pair| pair == ["--reportformat", "json"]));
    assert!(args.windows(2).any(|pair| pair == ["--units", "B"]));
}

#[rstest]
fn full_report_skips_entries_without_group_or_volumes(runner: ScriptedRunner) {
    runner.push_stdout(r#"{"report":[{"vg":[],"lv":[]}]}"#);
    let inventory = engine(&runner).full_report().expect("report should parse");
    assert!(inventory.groups().is_empty());
}

#[rstest]
fn full_report_accepts_suffixed_sizes(runner: ScriptedRunner) {
    runner.push_stdout(
        r#"{"report":[{"vg":[{"vg_name":"vg0","vg_size":"2048B","vg_free":"1024B"}],
            "lv":[{"lv_name":"data","lv_size":"1024B","lv_attr":"-wi-a-----"}]}]}"#,
    );
    let inventory = engine(&runner).full_report().expect("report should parse");
    let vg0 = inventory.group("vg0").expect("vg0 present");
    assert_eq!(vg0.group.size_bytes, 2_048);
    assert_eq!(vg0.volumes.first().map(|lv| lv.size_bytes), Some(1_024));
    assert_eq!(vg0.volumes.first().map(|lv| lv.vg_name.as_str()), Some("vg0"));
}

#[rstest]
fn full_report_failure_carries_engine_message(runner: ScriptedRunner) {
    runner.push_failure(5, "  Permission denied\n");
    let err = engine(&runner).full_report().expect_err("report should fail");
    assert_eq!(
        err,
        EngineError::CommandFailure {
            command: String::from("fullreport"),
            status_text: String::from("5"),
            message: String::from("Permission denied"),
        }
    );
}

#[rstest]
#[case::not_json("not json")]
#[case::wrong_shape(r#"{"reports":[]}"#)]
#[case::bad_size(
    r#"{"report":[{"vg":[{"vg_name":"vg0","vg_size":"lots","vg_free":"0"}],"lv":[]}]}"#
)]
fn full_report_rejects_malformed_output(runner: ScriptedRunner, #[case] stdout: &str) {
    runner.push_stdout(stdout);
    let err = engine(&runner).full_report().expect_err("parse should fail");
    assert!(matches!(err, EngineError::Parse { .. }), "unexpected {err:?}");
}

#[rstest]
#[case::two_groups(
    r#"{"report":[{"vg":[{"vg_name":"a","vg_size":"1","vg_free":"0"},
        {"vg_name":"b","vg_size":"1","vg_free":"0"}],"lv":[]}]}"#
)]
#[case::orphan_volumes(
    r#"{"report":[{"vg":[],"lv":[{"lv_name":"x","lv_size":"1","lv_attr":"-wi-a-----"}]}]}"#
)]
#[case::empty_attr(
    r#"{"report":[{"vg":[{"vg_name":"a","vg_size":"10","vg_free":"0"}],
        "lv":[{"lv_name":"x","lv_size":"1","lv_attr":""}]}]}"#
)]
#[case::free_exceeds_size(
    r#"{"report":[{"vg":[{"vg_name":"a","vg_size":"10","vg_free":"11"}],"lv":[]}]}"#
)]
fn full_report_contradictions_are_bugs(runner: ScriptedRunner, #[case] stdout: &str) {
    runner.push_stdout(stdout);
    let err = engine(&runner).full_report().expect_err("bug expected");
    assert!(matches!(err, EngineError::Bug(_)), "unexpected {err:?}");
    assert!(err.to_string().starts_with("lvm bug encountered"));
}

#[rstest]
#[case::snapshot(SNAPSHOT_ATTR, VolumeKind::Snapshot)]
#[case::invalid_snapshot("Swi-I-s---", VolumeKind::Snapshot)]
#[case::regular("-wi-a-----", VolumeKind::Regular)]
#[case::thin(THIN_ATTR, VolumeKind::Other)]
fn probe_classifies_attribute(
    runner: ScriptedRunner,
    #[case] attr: &str,
    #[case] expected: VolumeKind,
) {
    runner.push_stdout(json_probe("vg0", "snap_data", attr));
    let probe = engine(&runner)
        .probe("vg0", "snap_data")
        .expect("probe should succeed");
    assert_eq!(probe, Probe::Present(expected));

    let args = args_of(&runner);
    assert_eq!(args.last().map(String::as_str), Some("vg0/snap_data"));
    assert_eq!(runner.calls_to("lvs"), 1);
}

#[rstest]
fn probe_reports_absent_on_non_zero_exit(runner: ScriptedRunner) {
    runner.push_failure(5, "  Failed to find logical volume \"vg0/missing\"");
    let probe = engine(&runner)
        .probe("vg0", "missing")
        .expect("absence is not an error");
    assert_eq!(probe, Probe::Absent);
}

#[rstest]
#[case::no_entries(r#"{"report":[]}"#)]
#[case::no_volumes(r#"{"report":[{"lv":[]}]}"#)]
#[case::two_volumes(
    r#"{"report":[{"lv":[{"lv_name":"a","lv_attr":"-wi-a-----"},
        {"lv_name":"a","lv_attr":"-wi-a-----"}]}]}"#
)]
#[case::empty_attr(r#"{"report":[{"lv":[{"lv_name":"a","lv_attr":""}]}]}"#)]
fn probe_contradictions_are_bugs(runner: ScriptedRunner, #[case] stdout: &str) {
    runner.push_stdout(stdout);
    let err = engine(&runner).probe("vg0", "a").expect_err("bug expected");
    assert!(matches!(err, EngineError::Bug(_)), "unexpected {err:?}");
}

#[rstest]
fn create_snapshot_passes_exact_byte_size(runner: ScriptedRunner) {
    runner.push_success();
    let output = engine(&runner)
        .create_snapshot("vg0", "data", "snap_data", 200_000_512)
        .expect("runner succeeds");
    assert!(output.is_success());
    assert_eq!(runner.calls_to("lvcreate"), 1);
    assert_eq!(
        args_of(&runner),
        ["-s", "-n", "snap_data", "-L", "200000512B", "vg0/data"]
    );
}

#[rstest]
fn create_snapshot_returns_failed_output(runner: ScriptedRunner) {
    runner.push_failure(5, "  Insufficient free space");
    let output = engine(&runner)
        .create_snapshot("vg0", "data", "snap_data", 512)
        .expect("runner succeeds");
    assert!(!output.is_success());
    assert_eq!(output.message(), "Insufficient free space");
}

#[rstest]
fn remove_does_not_prompt(runner: ScriptedRunner) {
    runner.push_success();
    engine(&runner)
        .remove("vg0", "snap_data")
        .expect("runner succeeds");
    assert_eq!(runner.calls_to("lvremove"), 1);
    assert_eq!(args_of(&runner), ["-y", "vg0/snap_data"]);
}

#[rstest]
fn spawn_failures_surface_as_runner_errors(runner: ScriptedRunner) {
    let err = engine(&runner).full_report().expect_err("nothing scripted");
    assert!(matches!(err, EngineError::Runner(_)));
}
