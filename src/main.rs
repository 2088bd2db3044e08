//! Binary entry point for the `lvsnap` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use lvsnap::{
    CleanRequest, CommandRunner, ConfigError, EngineConfig, LifecycleError, Report, RequestError,
    Scope, ScopeError, SnapshotController, SnapshotNaming, SnapshotRequest,
};

mod cli;

use cli::{Cli, CleanCommand, NamingArgs, SelectionArgs, SnapshotCommand};

/// Exit status for usage, configuration, and fatal engine errors.
const ERROR_EXIT: i32 = 1;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Scope(#[from] ScopeError),
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),
}

/// A parsed and validated verb.
#[derive(Debug, Eq, PartialEq)]
enum Invocation {
    Snapshot(SnapshotRequest),
    Check(SnapshotRequest),
    Clean(CleanRequest),
}

impl Invocation {
    fn from_cli(cli: Cli) -> Result<Self, CliError> {
        let invocation = match cli {
            Cli::Snapshot(command) => Self::Snapshot(snapshot_request(command)?),
            Cli::Check(command) => Self::Check(snapshot_request(command)?),
            Cli::Clean(CleanCommand { selection, naming }) => {
                Self::Clean(CleanRequest::new(scope(&selection)?, policy(naming))?)
            }
        };
        Ok(invocation)
    }

    fn execute<R: CommandRunner>(
        &self,
        controller: &SnapshotController<R>,
    ) -> Result<Report, LifecycleError> {
        match self {
            Self::Snapshot(request) => controller.snapshot(request),
            Self::Check(request) => controller.check(request),
            Self::Clean(request) => controller.clean(request),
        }
    }
}

fn snapshot_request(command: SnapshotCommand) -> Result<SnapshotRequest, CliError> {
    let SnapshotCommand {
        selection,
        naming,
        percent,
    } = command;
    Ok(SnapshotRequest::new(
        scope(&selection)?,
        policy(naming),
        percent,
    )?)
}

fn scope(selection: &SelectionArgs) -> Result<Scope, ScopeError> {
    Scope::from_selection(
        selection.all,
        selection.volume_group.as_deref(),
        selection.logical_volume.as_deref(),
    )
}

fn policy(naming: NamingArgs) -> SnapshotNaming {
    SnapshotNaming::new(naming.prefix, naming.suffix)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { ERROR_EXIT } else { 0 };
            err.print().ok();
            process::exit(code);
        }
    };
    lvsnap::logging::init();

    let exit_code = match run(cli) {
        Ok(report) => write_report(io::stdout(), io::stderr(), &report),
        Err(err) => {
            write_error(io::stderr(), &err);
            ERROR_EXIT
        }
    };

    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<Report, CliError> {
    let invocation = Invocation::from_cli(cli)?;
    let config = EngineConfig::load_without_cli_args()?;
    let controller = SnapshotController::with_process_runner(config)?;
    Ok(invocation.execute(&controller)?)
}

/// Writes one line per entry, then the batch outcome, and returns the exit
/// status.
fn write_report(mut out: impl Write, mut err: impl Write, report: &Report) -> i32 {
    for entry in &report.entries {
        writeln!(out, "{entry}").ok();
    }
    if report.is_success() {
        writeln!(out, "{}", report.outcome).ok();
        0
    } else {
        writeln!(err, "{}", report.outcome).ok();
        report.outcome.status.code()
    }
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
