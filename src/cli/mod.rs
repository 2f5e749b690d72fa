//! Command-line interface definitions for the `linode-snapshotter` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Top-level CLI for the `linode-snapshotter` binary.
#[derive(Debug, Parser)]
#[command(
    name = "linode-snapshotter",
    about = "Snapshot, restore, and delete Linode Block Storage volumes",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Backend option passed through at initialisation. Repeatable.
    #[arg(
        long = "option",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        global = true
    )]
    pub(crate) options: Vec<(String, String)>,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Operations exposed by the CLI.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Clone a volume as a snapshot and print the snapshot id.
    #[command(name = "create-snapshot")]
    CreateSnapshot(CreateSnapshotCommand),
    /// Clone a snapshot into a new volume and print the volume id.
    #[command(name = "restore")]
    Restore(RestoreCommand),
    /// Delete the volume backing a snapshot.
    #[command(name = "delete-snapshot")]
    DeleteSnapshot(DeleteSnapshotCommand),
    /// Print the volume type and IOPS.
    #[command(name = "volume-info")]
    VolumeInfo(VolumeCommand),
    /// Print whether a volume is ready.
    #[command(name = "volume-ready")]
    VolumeReady(VolumeCommand),
    /// Print the volume handle stored in a persisted volume record.
    #[command(name = "get-volume-id")]
    GetVolumeId(GetVolumeIdCommand),
    /// Print a persisted volume record with its volume handle replaced.
    #[command(name = "set-volume-id")]
    SetVolumeId(SetVolumeIdCommand),
}

/// Arguments for `create-snapshot`.
#[derive(Debug, Parser)]
pub(crate) struct CreateSnapshotCommand {
    /// Composite volume identifier (`<id>-<label>`).
    #[arg(long)]
    pub(crate) volume_id: String,
    /// Availability zone of the volume.
    #[arg(long, default_value = "")]
    pub(crate) zone: String,
    /// Tag applied to the snapshot. Repeatable.
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) tags: Vec<(String, String)>,
}

/// Arguments for `restore`.
#[derive(Debug, Parser)]
pub(crate) struct RestoreCommand {
    /// Snapshot id as returned by `create-snapshot`.
    #[arg(long)]
    pub(crate) snapshot_id: String,
    /// Requested volume type.
    #[arg(long, default_value = "auto")]
    pub(crate) volume_type: String,
    /// Target availability zone.
    #[arg(long, default_value = "")]
    pub(crate) zone: String,
    /// Requested provisioned IOPS.
    #[arg(long)]
    pub(crate) iops: Option<i64>,
}

/// Arguments for `delete-snapshot`.
#[derive(Debug, Parser)]
pub(crate) struct DeleteSnapshotCommand {
    /// Snapshot id, bare or composite.
    #[arg(long)]
    pub(crate) snapshot_id: String,
}

/// Arguments shared by volume queries.
#[derive(Debug, Parser)]
pub(crate) struct VolumeCommand {
    /// Composite volume identifier (`<id>-<label>`).
    #[arg(long)]
    pub(crate) volume_id: String,
    /// Availability zone of the volume.
    #[arg(long, default_value = "")]
    pub(crate) zone: String,
}

/// Arguments for `get-volume-id`.
#[derive(Debug, Parser)]
pub(crate) struct GetVolumeIdCommand {
    /// Path to a JSON persisted volume record.
    #[arg(long, value_name = "PATH")]
    pub(crate) record: Utf8PathBuf,
}

/// Arguments for `set-volume-id`.
#[derive(Debug, Parser)]
pub(crate) struct SetVolumeIdCommand {
    /// Path to a JSON persisted volume record.
    #[arg(long, value_name = "PATH")]
    pub(crate) record: Utf8PathBuf,
    /// New volume handle.
    #[arg(long)]
    pub(crate) volume_id: String,
}

/// Parses `KEY=VALUE` pairs; the value may contain further `=`.
pub(crate) fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
