//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rpt",
    version,
    about = "Report Studio - manage per-client report configurations",
    long_about = "Validate, inspect, edit and move report configurations.\n\n\
                  Configurations are stored per scope: 'global' is the default for\n\
                  every client and 'client:<id>' overrides it for one client."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides the settings file).
    #[arg(long = "store", value_name = "DIR", global = true)]
    pub store: Option<PathBuf>,

    /// Data source catalog, a JSON array (overrides the settings file).
    #[arg(long = "catalog", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate the configuration stored for a scope.
    Validate {
        /// 'global' or 'client:<id>'.
        #[arg(value_name = "SCOPE")]
        scope: String,
    },

    /// Validate a configuration JSON file without storing it.
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List stored configurations.
    List,

    /// Show the configuration a client would be served.
    Show {
        /// Client id (default: the configured default client, else global).
        #[arg(long = "client", value_name = "ID")]
        client: Option<String>,
    },

    /// Delete the configuration stored for a scope.
    Delete {
        #[arg(value_name = "SCOPE")]
        scope: String,
    },

    /// Copy a stored configuration to a client.
    Duplicate {
        /// Scope to copy from.
        #[arg(value_name = "FROM")]
        from: String,
        /// Client id to copy to.
        #[arg(value_name = "CLIENT")]
        client: String,
    },

    /// Export every stored configuration as one JSON document.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long = "output", short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Import an export document. Valid entries are saved even if others fail.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Apply placement commands from a JSON file and save the result.
    Apply(ApplyArgs),
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// 'global' or 'client:<id>'.
    #[arg(value_name = "SCOPE")]
    pub scope: String,

    /// JSON array of placement commands.
    #[arg(value_name = "OPS_FILE")]
    pub ops: PathBuf,

    /// Apply and validate without saving.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
