//! bulkpdf CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

use bulkpdf_cli::logging::{LogConfig, LogFormat, init_logging};
use bulkpdf_cli::pipeline::{FillRequest, run_fill_form, run_generate_template};

mod cli;
mod summary;

use crate::cli::{Cli, Command, FillFormArgs, LogFormatArg, LogLevelArg};
use crate::summary::{print_fill_summary, print_template_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::GenerateTemplate(args) => {
            match run_generate_template(&args.template, &args.output_dir) {
                Ok(artifacts) => {
                    print_template_summary(&artifacts);
                    0
                }
                Err(error) => {
                    eprintln!("error: {error}");
                    1
                }
            }
        }
        Command::FillForm(args) => match run_fill_form(&fill_request(&args)) {
            Ok(result) => {
                print_fill_summary(&result);
                if result.report.all_succeeded() { 0 } else { 1 }
            }
            Err(error) => {
                eprintln!("error: {error}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn fill_request(args: &FillFormArgs) -> FillRequest {
    FillRequest {
        template: args.template.clone(),
        data_file: args.data_file.clone(),
        output_dir: args.output_dir.clone(),
        overwrite: args.overwrite,
        write_report: !args.no_report,
        show_progress: !args.no_progress,
    }
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
