//! Configuration loading via `ortho-config`.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default binary used for the structured full report.
pub const DEFAULT_LVM_BIN: &str = "lvm";
/// Default binary used to probe a single logical volume.
pub const DEFAULT_LVS_BIN: &str = "lvs";
/// Default binary used to create snapshots.
pub const DEFAULT_LVCREATE_BIN: &str = "lvcreate";
/// Default binary used to remove snapshots.
pub const DEFAULT_LVREMOVE_BIN: &str = "lvremove";

/// Paths to the LVM tools, merged from defaults, configuration files, and
/// environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "LVSNAP",
    discovery(
        app_name = "lvsnap",
        env_var = "LVSNAP_CONFIG_PATH",
        config_file_name = "lvsnap.toml",
        dotfile_name = ".lvsnap.toml",
        project_file_name = "lvsnap.toml"
    )
)]
pub struct EngineConfig {
    /// Path to the `lvm` executable used for `fullreport`.
    #[ortho_config(default = DEFAULT_LVM_BIN.to_owned())]
    pub lvm_bin: String,
    /// Path to the `lvs` executable.
    #[ortho_config(default = DEFAULT_LVS_BIN.to_owned())]
    pub lvs_bin: String,
    /// Path to the `lvcreate` executable.
    #[ortho_config(default = DEFAULT_LVCREATE_BIN.to_owned())]
    pub lvcreate_bin: String,
    /// Path to the `lvremove` executable.
    #[ortho_config(default = DEFAULT_LVREMOVE_BIN.to_owned())]
    pub lvremove_bin: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lvm_bin: DEFAULT_LVM_BIN.to_owned(),
            lvs_bin: DEFAULT_LVS_BIN.to_owned(),
            lvcreate_bin: DEFAULT_LVCREATE_BIN.to_owned(),
            lvremove_bin: DEFAULT_LVREMOVE_BIN.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("lvsnap")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Rejects blank binary paths with a message naming where to set them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(&self.lvm_bin, "lvm_bin")?;
        Self::require_field(&self.lvs_bin, "lvs_bin")?;
        Self::require_field(&self.lvcreate_bin, "lvcreate_bin")?;
        Self::require_field(&self.lvremove_bin, "lvremove_bin")?;
        Ok(())
    }

    fn require_field(value: &str, field: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "{field}: set LVSNAP_{} or add {field} to lvsnap.toml",
                field.to_uppercase()
            )));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}
