//! Report Studio CLI.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use rpt_cli::commands;
use rpt_cli::logging::{LogConfig, LogFormat, init_logging};
use rpt_cli::settings::Settings;
use rpt_model::Scope;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{ApplyArgs, Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Run one command. Returns the process exit code.
fn run(cli: Cli) -> Result<i32> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let store_dir: PathBuf = cli.store.clone().unwrap_or_else(|| settings.store_dir());
    let catalog = cli.catalog.clone().or_else(|| settings.store.catalog.clone());
    let gateway = commands::open_gateway(&store_dir, catalog.as_deref())?;

    match cli.command {
        Command::Validate { scope } => {
            let scope = commands::parse_scope(&scope)?;
            let (config, report) = commands::validate_stored(&gateway, &scope)?;
            println!("Configuration: {} ({})", config.name, config.id);
            summary::print_report(&report);
            Ok(if report.is_valid() { 0 } else { 1 })
        }
        Command::Check { file } => {
            let (config, report) = commands::check_file(&gateway, &file)?;
            println!("Configuration: {} ({})", config.name, config.id);
            summary::print_report(&report);
            Ok(if report.is_valid() { 0 } else { 1 })
        }
        Command::List => {
            summary::print_index(&commands::list(&gateway));
            Ok(0)
        }
        Command::Show { client } => {
            let scope = client
                .or(settings.default_client)
                .map_or(Scope::Global, Scope::client);
            summary::print_resolution(&commands::show(&gateway, &scope));
            Ok(0)
        }
        Command::Delete { scope } => {
            let scope = commands::parse_scope(&scope)?;
            commands::delete(&gateway, &scope)?;
            println!("Deleted configuration for {scope}.");
            Ok(0)
        }
        Command::Duplicate { from, client } => {
            let from = commands::parse_scope(&from)?;
            let receipt = commands::duplicate(&gateway, &from, &client)?;
            println!("{}", receipt.message);
            Ok(0)
        }
        Command::Export { output } => {
            let document = commands::export(&gateway, output.as_deref())?;
            if output.is_none() {
                println!("{document}");
            }
            Ok(0)
        }
        Command::Import { file } => {
            let report = commands::import(&gateway, &file)?;
            summary::print_import(&report);
            Ok(if report.is_complete() { 0 } else { 1 })
        }
        Command::Apply(args) => run_apply(&gateway, &settings, &args),
    }
}

fn run_apply(
    gateway: &rpt_persistence::PersistenceGateway,
    settings: &Settings,
    args: &ApplyArgs,
) -> Result<i32> {
    let scope = commands::parse_scope(&args.scope)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let outcome = runtime.block_on(commands::apply(
        gateway,
        &settings.autosave,
        scope,
        &args.ops,
        args.dry_run,
    ))?;
    summary::print_apply(&outcome);
    Ok(if outcome.save_error.is_some() { 1 } else { 0 })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
