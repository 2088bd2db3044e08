//! Snapshot naming and name-based ownership.
//!
//! A snapshot name is `prefix + source + suffix` with no escaping; callers
//! must keep path-hostile characters out of the prefix and suffix. The same
//! shape is how cleanup recognises snapshots this tool created.

/// Longest identifier the engine accepts for a `vg/lv` pair.
pub const MAX_LVM_NAME: usize = 127;

/// Derives the snapshot name for `source`.
#[must_use]
pub fn derive_name(source: &str, prefix: &str, suffix: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + source.len() + suffix.len());
    name.push_str(prefix);
    name.push_str(source);
    name.push_str(suffix);
    name
}

/// Returns `true` when the snapshot name for `lv_name` in `vg_name` fits the
/// engine's identifier limit.
#[must_use]
pub const fn validate_length(vg_name: &str, lv_name: &str, prefix: &str, suffix: &str) -> bool {
    vg_name.len() + lv_name.len() + prefix.len() + suffix.len() <= MAX_LVM_NAME
}

/// Returns `true` when `name` has the shape of a snapshot this tool created.
///
/// Purely syntactic: a user volume that happens to match is indistinguishable,
/// so callers must confirm the volume is a snapshot before acting on it.
#[must_use]
pub fn is_owned(name: &str, prefix: &str, suffix: &str) -> bool {
    name.starts_with(prefix) && name.ends_with(suffix)
}

/// Prefix and suffix pair used for one invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotNaming {
    prefix: String,
    suffix: String,
}

impl SnapshotNaming {
    /// Creates a naming policy, trimming surrounding whitespace.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim().to_owned(),
            suffix: suffix.into().trim().to_owned(),
        }
    }

    /// Configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Configured suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns `true` when neither a prefix nor a suffix is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    /// Snapshot name for `source`.
    #[must_use]
    pub fn snapshot_name(&self, source: &str) -> String {
        derive_name(source, &self.prefix, &self.suffix)
    }

    /// Whether the snapshot name for `lv_name` in `vg_name` fits the limit.
    #[must_use]
    pub fn fits(&self, vg_name: &str, lv_name: &str) -> bool {
        validate_length(vg_name, lv_name, &self.prefix, &self.suffix)
    }

    /// Whether `name` has the shape of a snapshot created with this policy.
    #[must_use]
    pub fn owns(&self, name: &str) -> bool {
        is_owned(name, &self.prefix, &self.suffix)
    }
}
