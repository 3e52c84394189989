//! CLI argument definitions for reclaim.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "reclaim",
    version,
    about = "Restore truncated records from a reference dataset",
    long_about = "Restore truncated records by resolving each one against a trusted\n\
                  reference dataset with an ordered list of match rules.\n\n\
                  Writes a patch file of resolved records and a list of records\n\
                  that remain unresolved."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Allow record text to appear in logs (redacted by default).
    #[arg(long = "log-text", global = true)]
    pub log_text: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve truncated records against the reference dataset.
    Match(MatchArgs),

    /// Report which records look truncated.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Reference dataset (CSV with full text, markup and source columns).
    #[arg(long = "reference", value_name = "CSV")]
    pub reference: PathBuf,

    /// Incomplete records (JSON array with id and questionText fields).
    #[arg(long = "incomplete", value_name = "JSON")]
    pub incomplete: PathBuf,

    /// Matching configuration (TOML).
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Pattern table mapping record ids to patterns (TOML or JSON).
    ///
    /// Overrides `pattern_table` from the config file.
    #[arg(long = "patterns", value_name = "FILE")]
    pub patterns: Option<PathBuf>,

    /// Directory for output artifacts (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the resolved-records artifact.
    #[arg(long = "matched-name", default_value = "matched_records.json")]
    pub matched_name: String,

    /// File name of the unresolved-records artifact.
    #[arg(long = "unmatched-name", default_value = "unmatched_records.json")]
    pub unmatched_name: String,

    /// Candidate selection policy (overrides the config file).
    #[arg(long = "selection", value_enum)]
    pub selection: Option<SelectionArg>,

    /// Characters compared by prefix containment (overrides the config file).
    #[arg(long = "prefix-length", value_name = "N")]
    pub prefix_length: Option<usize>,

    /// Match and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Incomplete records (JSON array with id and questionText fields).
    #[arg(long = "incomplete", value_name = "JSON")]
    pub incomplete: PathBuf,

    /// Number of most common endings to list.
    #[arg(long = "top", default_value_t = 10)]
    pub top: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SelectionArg {
    FirstMatch,
    BestScore,
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
