//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use remit_detect::DEFAULT_SAMPLE_ROWS;

#[derive(Parser)]
#[command(
    name = "remit",
    version,
    about = "Normalize payer billing reports into a canonical transaction table",
    long_about = "Detect which known layout a CSV billing report uses, run its\n\
                  cleaning pipeline, and write a canonical transaction table for\n\
                  import. Formats live in a JSON registry and new layouts can be\n\
                  learned from a sample file."
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

    /// Path of the format registry JSON file.
    #[arg(
        long = "registry",
        value_name = "PATH",
        default_value = "formats.json",
        global = true
    )]
    pub registry: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect which registered format a report file uses.
    Detect(DetectArgs),

    /// Transform a report file into the canonical transaction table.
    Transform(TransformArgs),

    /// List the registered format profiles.
    Formats,

    /// Learn a new format profile from a sample file.
    Learn(LearnArgs),
}

#[derive(Parser)]
pub struct DetectArgs {
    /// Report file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of data rows to sample for scoring.
    #[arg(long = "sample-rows", value_name = "N", default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub sample_rows: usize,
}

#[derive(Parser)]
pub struct TransformArgs {
    /// Report file to transform.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Use this format instead of auto-detecting.
    #[arg(long = "format", value_name = "NAME")]
    pub format: Option<String>,

    /// Output CSV path (default: <FILE stem>_canonical.csv next to the input).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct LearnArgs {
    /// Sample report file to learn from.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name for the new format profile.
    #[arg(long = "name", value_name = "NAME")]
    pub name: String,

    /// Description stored with the profile.
    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
