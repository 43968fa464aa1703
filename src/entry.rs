use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::info;

use crate::args::{DEFAULT_CONFIG_FILES, RunArgs};
use crate::domain::{RunConfig, RunEnd, RunReport};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::ReqwestExecutor;
use crate::runner::Runner;
use crate::shutdown_handlers::setup_signal_shutdown_handler;
use crate::sinks::stdout_writer;

/// Parses arguments, merges the config file and drives one run to the end.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, the runtime
/// cannot be built, or the run fails before completing.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };
    let args = apply_config(args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let config = RunConfig::from_args(&args).inspect_err(|err| {
        if matches!(err, AppError::Validation(ValidationError::MissingUrl)) {
            tracing::error!("Missing URL (set --url or provide in config).");
        }
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            AppError::validation(ValidationError::RuntimeBuildFailed { source: err })
        })?;

    runtime.block_on(run_async(&args, &config))
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;
    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(mut args: RunArgs, matches: &ArgMatches) -> AppResult<RunArgs> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

async fn run_async(args: &RunArgs, config: &RunConfig) -> AppResult<()> {
    let executor = Arc::new(ReqwestExecutor::new(config)?);
    let writer = stdout_writer(args.output_format);
    let runner = Runner::new();
    let signals = setup_signal_shutdown_handler(&runner.control());

    info!(
        "Sending {} {} requests per second to {}",
        config.rps.get(),
        config.method.as_str(),
        config.url
    );
    let report = runner.start(config, executor, writer).await;
    signals.abort();

    log_report(&report?);
    Ok(())
}

fn log_report(report: &RunReport) {
    let end = match report.end {
        RunEnd::Completed => "completed",
        RunEnd::Stopped => "stopped",
        RunEnd::Aborted => "aborted",
    };
    match report.aggregate.as_ref() {
        Some(aggregate) => info!(
            "Run {}: {} groups, {} requests dispatched, {} groups summarized",
            end,
            report.groups_dispatched,
            report.requests_dispatched,
            aggregate.groups_summarized
        ),
        None => info!(
            "Run {}: {} groups, {} requests dispatched",
            end, report.groups_dispatched, report.requests_dispatched
        ),
    }
}
