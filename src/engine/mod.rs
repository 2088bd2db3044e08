//! Thin wrapper around the LVM command-line tools.
//!
//! [`LvmEngine`] owns the four primitives the lifecycle controller consumes:
//! the structured full report, a per-volume probe, snapshot creation, and
//! removal. Queries are parsed here; mutations hand their raw
//! [`CommandOutput`] back so callers can classify failures and keep the
//! engine's message verbatim.

use std::ffi::OsString;

use crate::config::{ConfigError, EngineConfig};
use crate::inventory::Inventory;
use crate::runner::{CommandOutput, CommandRunner, ProcessCommandRunner};

mod error;
mod report;

pub use error::{EngineBug, EngineError};
pub use report::Probe;

/// Field list requested for volume groups in the full report.
const VG_FIELDS: &str = "vg_name,vg_uuid,vg_size,vg_free";
/// Field list requested for logical volumes in the full report.
const LV_FIELDS: &str = "lv_uuid,lv_name,lv_full_name,lv_path,lv_size,origin,origin_size,\
                         pool_lv,lv_tags,lv_attr,vg_name,data_percent,metadata_percent";
/// Field list requested when probing a single volume.
const PROBE_FIELDS: &str = "lv_name,vg_name,lv_attr,origin";

/// Engine collaborator driven through a [`CommandRunner`].
#[derive(Clone, Debug)]
pub struct LvmEngine<R: CommandRunner> {
    config: EngineConfig,
    runner: R,
}

impl LvmEngine<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when validation fails.
    pub fn with_process_runner(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> LvmEngine<R> {
    /// Creates an engine using the provided configuration and runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a binary path is blank.
    pub fn new(config: EngineConfig, runner: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    /// Queries the full volume topology.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CommandFailure`] when the report exits
    /// non-zero, [`EngineError::Parse`] when its output is not the expected
    /// report, [`EngineError::Bug`] when the report contradicts itself, and
    /// [`EngineError::Runner`] when `lvm` cannot be started.
    pub fn full_report(&self) -> Result<Inventory, EngineError> {
        let args = Self::full_report_args();
        let output = self.runner.run(&self.config.lvm_bin, &args)?;
        if !output.is_success() {
            return Err(EngineError::CommandFailure {
                command: String::from(report::FULLREPORT),
                status_text: output.status_text(),
                message: output.message(),
            });
        }
        report::parse_full_report(&output.stdout)
    }

    /// Checks whether `lv_name` exists in `vg_name` and what type it is.
    ///
    /// A non-zero exit from `lvs` is reported as [`Probe::Absent`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] for malformed output,
    /// [`EngineError::Bug`] when the query matches zero or several records
    /// or an empty attribute, and [`EngineError::Runner`] when `lvs` cannot
    /// be started.
    pub fn probe(&self, vg_name: &str, lv_name: &str) -> Result<Probe, EngineError> {
        let target = volume_path(vg_name, lv_name);
        let args = vec![
            OsString::from("--reportformat"),
            OsString::from("json"),
            OsString::from("-o"),
            OsString::from(PROBE_FIELDS),
            OsString::from(&target),
        ];
        let output = self.runner.run(&self.config.lvs_bin, &args)?;
        if !output.is_success() {
            return Ok(Probe::Absent);
        }
        report::parse_probe(&target, &output.stdout)
    }

    /// Creates a snapshot of `origin` named `name` reserving `size_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Runner`] when `lvcreate` cannot be started.
    pub fn create_snapshot(
        &self,
        vg_name: &str,
        origin: &str,
        name: &str,
        size_bytes: u64,
    ) -> Result<CommandOutput, EngineError> {
        let args = vec![
            OsString::from("-s"),
            OsString::from("-n"),
            OsString::from(name),
            OsString::from("-L"),
            OsString::from(format!("{size_bytes}B")),
            OsString::from(volume_path(vg_name, origin)),
        ];
        Ok(self.runner.run(&self.config.lvcreate_bin, &args)?)
    }

    /// Removes volume `name` from `vg_name` without prompting.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Runner`] when `lvremove` cannot be started.
    pub fn remove(&self, vg_name: &str, name: &str) -> Result<CommandOutput, EngineError> {
        let args = vec![
            OsString::from("-y"),
            OsString::from(volume_path(vg_name, name)),
        ];
        Ok(self.runner.run(&self.config.lvremove_bin, &args)?)
    }

    fn full_report_args() -> Vec<OsString> {
        [
            "fullreport",
            "--units",
            "B",
            "--nosuffix",
            "--configreport",
            "vg",
            "-o",
            VG_FIELDS,
            "--configreport",
            "lv",
            "-o",
            LV_FIELDS,
            "--configreport",
            "pv",
            "-o",
            "pv_name",
            "--reportformat",
            "json",
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }
}

fn volume_path(vg_name: &str, lv_name: &str) -> String {
    format!("{vg_name}/{lv_name}")
}

#[cfg(test)]
mod tests;
