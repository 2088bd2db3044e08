//! Test support utilities shared across unit and integration tests.
//!
//! [`ScriptedRunner`] replays pre-seeded outputs in FIFO order, while
//! [`LvmSimulator`] keeps a small in-memory volume manager and answers the
//! same commands the engine issues, so multi-run scenarios observe their own
//! mutations.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::capacity::GRANULARITY;
use crate::config::{
    DEFAULT_LVCREATE_BIN, DEFAULT_LVM_BIN, DEFAULT_LVREMOVE_BIN, DEFAULT_LVS_BIN,
};
use crate::runner::{CommandOutput, CommandRunner, RunnerError};

/// Attribute string reported for a plain volume.
pub const REGULAR_ATTR: &str = "-wi-a-----";
/// Attribute string reported for a snapshot.
pub const SNAPSHOT_ATTR: &str = "swi-a-s---";
/// Attribute string reported for a volume that has snapshots.
pub const ORIGIN_ATTR: &str = "owi-a-s---";
/// Attribute string reported for a thin volume.
pub const THIN_ATTR: &str = "Vwi-a-tz--";

/// Exit code `lvs` uses when a volume cannot be found.
const NOT_FOUND_CODE: i32 = 5;

/// Records a single invocation made through a fake runner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    fn arg_after(&self, flag: &str) -> Option<String> {
        let mut args = self.args.iter().map(|arg| arg.to_string_lossy());
        args.by_ref().find(|arg| arg == flag)?;
        args.next().map(std::borrow::Cow::into_owned)
    }

    fn last_arg(&self) -> Option<String> {
        self.args
            .last()
            .map(|arg| arg.to_string_lossy().into_owned())
    }
}

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic command outcomes without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<CommandOutput>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Counts recorded invocations of `program`.
    #[must_use]
    pub fn calls_to(&self, program: &str) -> usize {
        self.invocations
            .borrow()
            .iter()
            .filter(|call| call.program == program)
            .count()
    }

    /// Pushes a successful exit status with no output.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32, stderr: impl Into<String>) {
        self.push_output(Some(code), "", stderr);
    }

    /// Pushes a successful response carrying `stdout`.
    pub fn push_stdout(&self, stdout: impl Into<String>) {
        self.push_output(Some(0), stdout, "");
    }

    /// Pushes an explicit command output response.
    pub fn push_output(
        &self,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        });
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, RunnerError> {
        self.invocations.borrow_mut().push(CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RunnerError::Spawn {
                program: program.to_owned(),
                message: String::from("no scripted response available"),
            })
    }
}

/// Volume description used to build fake reports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FakeVolume {
    /// Volume name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Attribute string.
    pub attr: String,
    /// Origin volume for snapshots.
    pub origin: Option<String>,
}

impl FakeVolume {
    /// A plain volume.
    #[must_use]
    pub fn regular(name: &str, size_bytes: u64) -> Self {
        Self {
            name: name.to_owned(),
            size_bytes,
            attr: String::from(REGULAR_ATTR),
            origin: None,
        }
    }

    /// A snapshot of `origin`.
    #[must_use]
    pub fn snapshot(name: &str, origin: &str, size_bytes: u64) -> Self {
        Self {
            name: name.to_owned(),
            size_bytes,
            attr: String::from(SNAPSHOT_ATTR),
            origin: Some(origin.to_owned()),
        }
    }

    /// A volume with an arbitrary attribute string.
    #[must_use]
    pub fn with_attr(name: &str, size_bytes: u64, attr: &str) -> Self {
        Self {
            name: name.to_owned(),
            size_bytes,
            attr: attr.to_owned(),
            origin: None,
        }
    }

    fn to_json(&self, vg_name: &str) -> Value {
        json!({
            "lv_uuid": format!("uuid-{vg_name}-{}", self.name),
            "lv_name": self.name,
            "lv_full_name": format!("{vg_name}/{}", self.name),
            "lv_path": format!("/dev/{vg_name}/{}", self.name),
            "lv_size": self.size_bytes.to_string(),
            "origin": self.origin.clone().unwrap_or_default(),
            "origin_size": "",
            "pool_lv": "",
            "lv_tags": "",
            "lv_attr": self.attr,
            "vg_name": vg_name,
            "data_percent": "",
            "metadata_percent": "",
        })
    }
}

/// Volume group description used to build fake reports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FakeGroup {
    /// Group name.
    pub name: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// Free space in bytes.
    pub free_bytes: u64,
    /// Volumes in report order.
    pub volumes: Vec<FakeVolume>,
}

impl FakeGroup {
    /// A group with `free_bytes` free and room for its volumes.
    #[must_use]
    pub fn new(name: &str, free_bytes: u64, volumes: Vec<FakeVolume>) -> Self {
        let used = volumes
            .iter()
            .map(|volume| volume.size_bytes)
            .fold(0_u64, u64::saturating_add);
        Self {
            name: name.to_owned(),
            size_bytes: used.saturating_add(free_bytes),
            free_bytes,
            volumes,
        }
    }

    fn to_json(&self) -> Value {
        let volumes = self
            .volumes
            .iter()
            .map(|volume| volume.to_json(&self.name))
            .collect::<Vec<_>>();
        json!({
            "vg": [{
                "vg_name": self.name,
                "vg_uuid": format!("uuid-{}", self.name),
                "vg_size": self.size_bytes.to_string(),
                "vg_free": self.free_bytes.to_string(),
            }],
            "pv": [{ "pv_name": format!("/dev/disk-{}", self.name) }],
            "lv": volumes,
            "pvseg": [],
            "seg": [],
        })
    }
}

/// Produces a payload matching `lvm fullreport --reportformat json`.
#[must_use]
pub fn json_full_report(groups: &[FakeGroup]) -> String {
    let report = groups.iter().map(FakeGroup::to_json).collect::<Vec<_>>();
    json!({ "report": report }).to_string()
}

/// Produces a payload matching `lvs --reportformat json` for one volume.
#[must_use]
pub fn json_probe(vg_name: &str, lv_name: &str, attr: &str) -> String {
    json!({
        "report": [{
            "lv": [{
                "lv_name": lv_name,
                "vg_name": vg_name,
                "lv_attr": attr,
                "origin": "",
            }]
        }]
    })
    .to_string()
}

#[derive(Debug, Default)]
struct SimulatorState {
    groups: Vec<FakeGroup>,
    invocations: Vec<CommandInvocation>,
    report_failure: Option<String>,
    create_failures: Vec<(String, String)>,
    remove_failures: Vec<(String, String)>,
}

/// Stateful fake volume manager answering `lvm fullreport`, `lvs`,
/// `lvcreate -s`, and `lvremove -y`.
///
/// Recognises the default binary names from [`crate::config`].
#[derive(Clone, Debug, Default)]
pub struct LvmSimulator {
    state: Rc<RefCell<SimulatorState>>,
}

impl LvmSimulator {
    /// Creates a simulator holding `groups`.
    #[must_use]
    pub fn new(groups: Vec<FakeGroup>) -> Self {
        let simulator = Self::default();
        simulator.state.borrow_mut().groups = groups;
        simulator
    }

    /// Adds an empty volume group with `free_bytes` free.
    pub fn add_group(&self, name: &str, free_bytes: u64) {
        self.state
            .borrow_mut()
            .groups
            .push(FakeGroup::new(name, free_bytes, Vec::new()));
    }

    /// Adds `volume` to group `vg_name`, growing the group to hold it.
    ///
    /// Returns `false` when the group does not exist.
    pub fn add_volume(&self, vg_name: &str, volume: FakeVolume) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(group) = state.groups.iter_mut().find(|group| group.name == vg_name) else {
            return false;
        };
        group.size_bytes = group.size_bytes.saturating_add(volume.size_bytes);
        group.volumes.push(volume);
        true
    }

    /// Makes every full report exit non-zero with `stderr`.
    pub fn fail_report(&self, stderr: &str) {
        self.state.borrow_mut().report_failure = Some(stderr.to_owned());
    }

    /// Makes creation of snapshot `name` fail with `stderr`.
    pub fn fail_create(&self, name: &str, stderr: &str) {
        self.state
            .borrow_mut()
            .create_failures
            .push((name.to_owned(), stderr.to_owned()));
    }

    /// Makes removal of volume `name` fail with `stderr`.
    pub fn fail_remove(&self, name: &str, stderr: &str) {
        self.state
            .borrow_mut()
            .remove_failures
            .push((name.to_owned(), stderr.to_owned()));
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.state.borrow().invocations.clone()
    }

    /// Counts recorded invocations of `program`.
    #[must_use]
    pub fn calls_to(&self, program: &str) -> usize {
        self.state
            .borrow()
            .invocations
            .iter()
            .filter(|call| call.program == program)
            .count()
    }

    /// Number of `lvcreate` calls issued.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.calls_to(DEFAULT_LVCREATE_BIN)
    }

    /// Number of `lvremove` calls issued.
    #[must_use]
    pub fn remove_calls(&self) -> usize {
        self.calls_to(DEFAULT_LVREMOVE_BIN)
    }

    /// Current volumes of `vg_name`, if the group exists.
    #[must_use]
    pub fn volumes(&self, vg_name: &str) -> Option<Vec<FakeVolume>> {
        self.state
            .borrow()
            .groups
            .iter()
            .find(|group| group.name == vg_name)
            .map(|group| group.volumes.clone())
    }

    /// Current free space of `vg_name`, if the group exists.
    #[must_use]
    pub fn free_bytes(&self, vg_name: &str) -> Option<u64> {
        self.state
            .borrow()
            .groups
            .iter()
            .find(|group| group.name == vg_name)
            .map(|group| group.free_bytes)
    }

    fn report(&self) -> CommandOutput {
        let state = self.state.borrow();
        if let Some(stderr) = state.report_failure.as_ref() {
            return failure(NOT_FOUND_CODE, stderr);
        }
        success(json_full_report(&state.groups))
    }

    fn probe(&self, call: &CommandInvocation) -> CommandOutput {
        let Some((vg_name, lv_name)) = call.last_arg().as_deref().and_then(split_target) else {
            return failure(3, "  Invalid argument");
        };
        let state = self.state.borrow();
        state
            .groups
            .iter()
            .find(|group| group.name == vg_name)
            .and_then(|group| group.volumes.iter().find(|volume| volume.name == lv_name))
            .map_or_else(
                || {
                    failure(
                        NOT_FOUND_CODE,
                        &format!("  Failed to find logical volume \"{vg_name}/{lv_name}\""),
                    )
                },
                |volume| success(json_probe(&vg_name, &lv_name, &volume.attr)),
            )
    }

    fn create(&self, call: &CommandInvocation) -> CommandOutput {
        let (Some(name), Some(size), Some((vg_name, origin))) = (
            call.arg_after("-n"),
            call.arg_after("-L").as_deref().and_then(parse_size),
            call.last_arg().as_deref().and_then(split_target),
        ) else {
            return failure(3, "  Invalid argument");
        };

        let mut state = self.state.borrow_mut();
        if let Some((_, stderr)) = state
            .create_failures
            .iter()
            .find(|(failing, _)| *failing == name)
        {
            return failure(NOT_FOUND_CODE, stderr);
        }
        let Some(group) = state.groups.iter_mut().find(|group| group.name == vg_name) else {
            return failure(NOT_FOUND_CODE, &format!("  Volume group \"{vg_name}\" not found"));
        };
        if !group.volumes.iter().any(|volume| volume.name == origin) {
            return failure(
                NOT_FOUND_CODE,
                &format!("  Failed to find logical volume \"{vg_name}/{origin}\""),
            );
        }
        if group.volumes.iter().any(|volume| volume.name == name) {
            return failure(
                NOT_FOUND_CODE,
                &format!("  Logical Volume \"{name}\" already exists in volume group \"{vg_name}\""),
            );
        }
        if size > group.free_bytes || size.checked_rem(GRANULARITY) != Some(0) {
            return failure(NOT_FOUND_CODE, "  Insufficient free space");
        }
        group.free_bytes -= size;
        if let Some(source) = group.volumes.iter_mut().find(|volume| volume.name == origin) {
            source.attr = String::from(ORIGIN_ATTR);
        }
        group
            .volumes
            .push(FakeVolume::snapshot(&name, &origin, size));
        success(format!("  Logical volume \"{name}\" created.\n"))
    }

    fn remove(&self, call: &CommandInvocation) -> CommandOutput {
        let Some((vg_name, name)) = call.last_arg().as_deref().and_then(split_target) else {
            return failure(3, "  Invalid argument");
        };
        let mut state = self.state.borrow_mut();
        if let Some((_, stderr)) = state
            .remove_failures
            .iter()
            .find(|(failing, _)| *failing == name)
        {
            return failure(NOT_FOUND_CODE, stderr);
        }
        let Some(group) = state.groups.iter_mut().find(|group| group.name == vg_name) else {
            return failure(NOT_FOUND_CODE, &format!("  Volume group \"{vg_name}\" not found"));
        };
        let Some(position) = group.volumes.iter().position(|volume| volume.name == name) else {
            return failure(
                NOT_FOUND_CODE,
                &format!("  Failed to find logical volume \"{vg_name}/{name}\""),
            );
        };
        let removed = group.volumes.remove(position);
        group.free_bytes = group.free_bytes.saturating_add(removed.size_bytes);
        if let Some(origin) = removed.origin {
            let orphaned = !group
                .volumes
                .iter()
                .any(|volume| volume.origin.as_ref() == Some(&origin));
            if let Some(source) = group
                .volumes
                .iter_mut()
                .find(|volume| orphaned && volume.name == origin && volume.attr == ORIGIN_ATTR)
            {
                source.attr = String::from(REGULAR_ATTR);
            }
        }
        success(format!("  Logical volume \"{name}\" successfully removed.\n"))
    }
}

impl CommandRunner for LvmSimulator {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, RunnerError> {
        let call = CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        };
        self.state.borrow_mut().invocations.push(call.clone());

        match program {
            DEFAULT_LVM_BIN => Ok(self.report()),
            DEFAULT_LVS_BIN => Ok(self.probe(&call)),
            DEFAULT_LVCREATE_BIN => Ok(self.create(&call)),
            DEFAULT_LVREMOVE_BIN => Ok(self.remove(&call)),
            _ => Err(RunnerError::Spawn {
                program: program.to_owned(),
                message: String::from("not simulated"),
            }),
        }
    }
}

fn split_target(target: &str) -> Option<(String, String)> {
    let (vg_name, lv_name) = target.split_once('/')?;
    Some((vg_name.to_owned(), lv_name.to_owned()))
}

fn parse_size(value: &str) -> Option<u64> {
    value.strip_suffix('B')?.parse().ok()
}

fn success(stdout: impl Into<String>) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout: stdout.into(),
        stderr: String::new(),
    }
}

fn failure(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_owned(),
    }
}
