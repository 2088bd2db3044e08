//! Command-line interface definitions for the `lvsnap` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser};

/// Top-level CLI for the `lvsnap` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lvsnap",
    version,
    about = "Create, check, and clean up LVM snapshots of logical volumes",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create snapshots for the selected volumes.
    #[command(name = "snapshot", about = "Create snapshots for the selected volumes")]
    Snapshot(SnapshotCommand),
    /// Check whether snapshots could be created without creating them.
    #[command(
        name = "check",
        about = "Check whether snapshots could be created without creating them"
    )]
    Check(SnapshotCommand),
    /// Remove snapshots previously created with the same prefix and suffix.
    #[command(
        name = "clean",
        about = "Remove snapshots previously created with the same prefix and suffix"
    )]
    Clean(CleanCommand),
}

/// Volume selection shared by every subcommand.
///
/// Exclusivity between `--all` and `--volume-group` is checked by the binary
/// so usage errors exit with status 1.
#[derive(Debug, Args)]
pub(crate) struct SelectionArgs {
    /// Operate on every logical volume in every volume group.
    #[arg(short = 'a', long)]
    pub(crate) all: bool,
    /// Operate on the logical volumes of this volume group.
    #[arg(long = "volume-group", visible_alias = "vg", value_name = "VG")]
    pub(crate) volume_group: Option<String>,
    /// Narrow the volume group selection to this logical volume.
    #[arg(long = "logical-volume", visible_alias = "lv", value_name = "LV")]
    pub(crate) logical_volume: Option<String>,
}

/// Snapshot naming shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct NamingArgs {
    /// Text prepended to the source volume name.
    #[arg(short = 'p', long, value_name = "PREFIX", default_value = "")]
    pub(crate) prefix: String,
    /// Text appended to the source volume name.
    #[arg(short = 's', long, value_name = "SUFFIX", default_value = "")]
    pub(crate) suffix: String,
}

/// Arguments for `lvsnap snapshot` and `lvsnap check`.
#[derive(Debug, Args)]
pub(crate) struct SnapshotCommand {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    #[command(flatten)]
    pub(crate) naming: NamingArgs,
    /// Percentage of each origin's size reserved for its snapshot.
    #[arg(
        short = 'r',
        long = "percent-available",
        value_name = "PERCENT",
        default_value_t = 20,
        value_parser = clap::value_parser!(u8).range(10..=99)
    )]
    pub(crate) percent: u8,
}

/// Arguments for `lvsnap clean`.
#[derive(Debug, Args)]
pub(crate) struct CleanCommand {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    #[command(flatten)]
    pub(crate) naming: NamingArgs,
}
