//! Selection of the volumes an invocation acts on.

use thiserror::Error;

/// Which part of the inventory an invocation covers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scope {
    /// Every volume in every group.
    All,
    /// Every volume in one group.
    Group {
        /// Selected volume group.
        vg_name: String,
    },
    /// One volume in one group.
    Volume {
        /// Group holding the volume.
        vg_name: String,
        /// Selected logical volume.
        lv_name: String,
    },
}

impl Scope {
    /// Builds a scope from the raw `--all` / group / volume selection.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when both or neither of `all` and a group are
    /// selected, or when a volume is named without a group.
    pub fn from_selection(
        all: bool,
        vg_name: Option<&str>,
        lv_name: Option<&str>,
    ) -> Result<Self, ScopeError> {
        let group = vg_name.map(str::trim).filter(|name| !name.is_empty());
        let volume = lv_name.map(str::trim).filter(|name| !name.is_empty());

        match (all, group, volume) {
            (true, Some(_), _) => Err(ScopeError::Conflicting),
            (_, None, Some(_)) => Err(ScopeError::VolumeWithoutGroup),
            (true, None, None) => Ok(Self::All),
            (false, None, None) => Err(ScopeError::Missing),
            (false, Some(vg), None) => Ok(Self::Group {
                vg_name: vg.to_owned(),
            }),
            (false, Some(vg), Some(lv)) => Ok(Self::Volume {
                vg_name: vg.to_owned(),
                lv_name: lv.to_owned(),
            }),
        }
    }

    /// Selected group name, if the scope names one.
    #[must_use]
    pub fn vg_name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Group { vg_name } | Self::Volume { vg_name, .. } => Some(vg_name),
        }
    }

    /// Selected volume name, if the scope names one.
    #[must_use]
    pub fn lv_name(&self) -> Option<&str> {
        match self {
            Self::Volume { lv_name, .. } => Some(lv_name),
            Self::All | Self::Group { .. } => None,
        }
    }

    /// Whether the scope covers volume group `vg_name`.
    #[must_use]
    pub fn includes_group(&self, vg_name: &str) -> bool {
        self.vg_name().is_none_or(|selected| selected == vg_name)
    }

    /// Whether the scope covers volume `lv_name` in a group it already
    /// includes.
    #[must_use]
    pub fn includes_volume(&self, lv_name: &str) -> bool {
        self.lv_name().is_none_or(|selected| selected == lv_name)
    }
}

/// Usage errors raised before any engine call is made.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScopeError {
    /// Both `--all` and a volume group were selected.
    #[error("--all and --volume-group are mutually exclusive")]
    Conflicting,
    /// Neither `--all` nor a volume group was selected.
    #[error("must specify either --all or a volume group")]
    Missing,
    /// A logical volume was named without its volume group.
    #[error("--logical-volume requires --volume-group")]
    VolumeWithoutGroup,
}
