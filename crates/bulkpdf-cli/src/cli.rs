//! CLI argument definitions for bulkpdf.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bulkpdf",
    version,
    about = "Fill PDF forms in bulk from spreadsheet data",
    long_about = "Generate a spreadsheet template from a fillable PDF form,\n\
                  then fill one output PDF per data row.\n\n\
                  The reserved _output_filename column names each generated file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Inspect a PDF form and generate the spreadsheet template.
    GenerateTemplate(GenerateTemplateArgs),

    /// Fill one PDF per data row from a completed spreadsheet.
    FillForm(FillFormArgs),
}

#[derive(Parser)]
pub struct GenerateTemplateArgs {
    /// Path to the fillable PDF form.
    #[arg(long = "template", short = 't', value_name = "PDF")]
    pub template: PathBuf,

    /// Directory for the generated template and field info files.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct FillFormArgs {
    /// Path to the fillable PDF form.
    #[arg(long = "template", short = 't', value_name = "PDF")]
    pub template: PathBuf,

    /// Path to the CSV data file based on the generated template.
    #[arg(long = "data-file", short = 'd', value_name = "CSV")]
    pub data_file: PathBuf,

    /// Directory for the filled PDF documents.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Allow a non-empty output directory and replace existing files.
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Skip writing the JSON run report.
    #[arg(long = "no-report")]
    pub no_report: bool,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
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
