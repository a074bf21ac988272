//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use equip_model::DatasetId;

#[derive(Parser)]
#[command(
    name = "equipment",
    version,
    about = "Chemical equipment dataset tool - upload CSVs, browse history, export reports",
    long_about = "Upload chemical equipment CSV files and inspect their statistics.\n\n\
                  Each user (or the shared anonymous history) keeps the five most\n\
                  recent uploads. History is stored in --data-dir when given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding history snapshots and equipment.toml.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: <DATA_DIR>/equipment.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Access token; without one the shared anonymous history is used.
    #[arg(long = "token", value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Maximum accepted upload size in bytes.
    #[arg(long = "max-upload-bytes", value_name = "BYTES", global = true)]
    pub max_upload_bytes: Option<usize>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a CSV file and print its statistics.
    Upload(UploadArgs),

    /// List stored uploads, newest first.
    History,

    /// Show one stored upload.
    Show(ShowArgs),

    /// Render the report of a stored upload.
    Report(ReportArgs),

    /// Delete a stored upload.
    Delete(DeleteArgs),

    /// Print the user behind --token.
    Whoami,
}

#[derive(Args)]
pub struct UploadArgs {
    /// CSV file with Equipment Name, Type, Flowrate, Pressure and Temperature columns.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name recorded in history (default: the file name).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(value_name = "ID")]
    pub id: DatasetId,

    /// Also print every record.
    #[arg(long = "records")]
    pub records: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(value_name = "ID")]
    pub id: DatasetId,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,

    /// Output file or directory (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(value_name = "ID")]
    pub id: DatasetId,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
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
