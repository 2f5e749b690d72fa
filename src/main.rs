//! Binary entry point for the `linode-snapshotter` CLI.

use std::io::{self, Write};
use std::process;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use linode_snapshotter::{
    ConfigError, LinodeConfig, LinodeSnapshotter, PersistedVolume, PluginOptions, RecordError,
    SnapshotTags, SnapshotterError, VolumeSnapshotter, record,
};

mod cli;

use cli::{Cli, Command};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshotter(#[from] SnapshotterError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("{path} does not hold a JSON object record: {message}")]
    InvalidRecord { path: String, message: String },
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let options: PluginOptions = cli.options.into_iter().collect();
    match cli.command {
        Command::CreateSnapshot(args) => {
            let tags: SnapshotTags = args.tags.into_iter().collect();
            let snapshot_id = init_snapshotter(options)?
                .create_snapshot(&args.volume_id, &args.zone, &tags)
                .await?;
            write_line(&snapshot_id)
        }
        Command::Restore(args) => {
            let volume_id = init_snapshotter(options)?
                .create_volume_from_snapshot(
                    &args.snapshot_id,
                    &args.volume_type,
                    &args.zone,
                    args.iops,
                )
                .await?;
            write_line(&volume_id)
        }
        Command::DeleteSnapshot(args) => {
            init_snapshotter(options)?
                .delete_snapshot(&args.snapshot_id)
                .await?;
            Ok(())
        }
        Command::VolumeInfo(args) => {
            let info = init_snapshotter(options)?
                .get_volume_info(&args.volume_id, &args.zone)
                .await?;
            let iops = info
                .iops
                .map_or_else(|| String::from("none"), |value| value.to_string());
            write_line(&format!("type={} iops={iops}", info.volume_type))
        }
        Command::VolumeReady(args) => {
            let ready = init_snapshotter(options)?.is_volume_ready(&args.volume_id, &args.zone);
            write_line(&ready.to_string())
        }
        Command::GetVolumeId(args) => {
            let persisted = read_record(&args.record)?;
            write_line(&record::get_volume_id(&persisted)?)
        }
        Command::SetVolumeId(args) => {
            let persisted = read_record(&args.record)?;
            let updated = record::set_volume_id(&persisted, &args.volume_id)?;
            let rendered = serde_json::to_string_pretty(&updated)
                .map_err(|err| CliError::Output(err.to_string()))?;
            write_line(&rendered)
        }
    }
}

fn init_snapshotter(options: PluginOptions) -> Result<LinodeSnapshotter, CliError> {
    let config = LinodeConfig::load_without_cli_args()?;
    config.validate()?;
    Ok(LinodeSnapshotter::init(options, &config))
}

fn read_record(path: &Utf8Path) -> Result<PersistedVolume, CliError> {
    let read_error = |message: String| CliError::Read {
        path: path.to_string(),
        message,
    };
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| read_error(String::from("path is missing a filename")))?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| read_error(err.to_string()))?;
    let contents = dir
        .read_to_string(file_name)
        .map_err(|err| read_error(err.to_string()))?;

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(persisted)) => Ok(persisted),
        Ok(other) => Err(CliError::InvalidRecord {
            path: path.to_string(),
            message: format!("found {}", json_kind(&other)),
        }),
        Err(err) => Err(CliError::InvalidRecord {
            path: path.to_string(),
            message: err.to_string(),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn write_line(line: &str) -> Result<(), CliError> {
    writeln!(io::stdout(), "{line}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
