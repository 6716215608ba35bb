//! Command pipelines behind the CLI surface.
//!
//! Two flows, each a thin ordered composition of the library crates:
//!
//! 1. **generate-template**: open the PDF, extract the field catalog,
//!    write the spreadsheet template and field info artifacts.
//! 2. **fill-form**: open the PDF and the data file, run the fill
//!    engine over every row, then write the JSON run report.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use bulkpdf_engine::{FillEngine, OverwritePolicy, RowOutcome, check_data_file, check_template_file};
use bulkpdf_ingest::DataSource;
use bulkpdf_model::{MergeOptions, RowFailure, RunReport};
use bulkpdf_pdf::FormTemplate;
use bulkpdf_template::{TemplateArtifacts, write_template_files};

const REPORT_SCHEMA: &str = "bulkpdf-run-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Inputs for a fill run, resolved from CLI arguments.
#[derive(Debug, Clone)]
pub struct FillRequest {
    pub template: PathBuf,
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    /// Permit a non-empty output directory and replacing existing files.
    pub overwrite: bool,
    /// Write `merge_report.json` next to the filled documents.
    pub write_report: bool,
    /// Draw a progress bar on stderr while rows are processed.
    pub show_progress: bool,
}

/// Everything the summary printer needs after a fill run.
#[derive(Debug)]
pub struct FillResult {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    pub report: RunReport,
    pub report_path: Option<PathBuf>,
}

/// Extract the field catalog from a PDF form and write the
/// spreadsheet template plus the field info file.
pub fn run_generate_template(template: &Path, output_dir: &Path) -> Result<TemplateArtifacts> {
    let options = MergeOptions::default();
    check_template_file(template)?;
    bulkpdf_engine::prepare_output_directory(output_dir, false, true)?;
    let form = FormTemplate::open(template, &options)?;
    info!(
        template = %template.display(),
        fields = form.catalog().len(),
        "extracted field catalog"
    );
    let artifacts = write_template_files(form.catalog(), form.path(), output_dir, &options)?;
    Ok(artifacts)
}

/// Fill one output PDF per data row and write the run report.
///
/// Row-level failures are carried in the returned report; only setup
/// problems (unreadable template or data file, unusable output
/// directory) surface as errors.
pub fn run_fill_form(request: &FillRequest) -> Result<FillResult> {
    let options = MergeOptions::default();
    check_template_file(&request.template)?;
    check_data_file(&request.data_file)?;

    let form = FormTemplate::open(&request.template, &options)?;
    let source = DataSource::open(&request.data_file)?;
    info!(
        template = %request.template.display(),
        data_file = %request.data_file.display(),
        rows = source.len(),
        "starting fill-form run"
    );

    let policy = OverwritePolicy::from_flag(request.overwrite);
    let progress = build_progress_bar(source.len(), request.show_progress);
    let engine = FillEngine::new(&options);
    let report = engine.run_with(
        form.catalog(),
        &form,
        &source,
        &request.output_dir,
        policy,
        |outcome| {
            progress.inc(1);
            match outcome {
                RowOutcome::Succeeded { filename, .. } => {
                    progress.set_message(filename.clone());
                }
                RowOutcome::Failed { row_number, .. } => {
                    progress.set_message(format!("row {row_number} failed"));
                }
                RowOutcome::Skipped { .. } => {}
            }
        },
    )?;
    progress.finish_and_clear();

    let report_path = if request.write_report {
        Some(write_run_report_json(
            &request.output_dir,
            &request.template,
            &request.data_file,
            &report,
            &options,
        )?)
    } else {
        None
    };

    Ok(FillResult {
        data_file: request.data_file.clone(),
        output_dir: request.output_dir.clone(),
        report,
        report_path,
    })
}

fn build_progress_bar(rows: usize, show_progress: bool) -> ProgressBar {
    if !show_progress || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} rows {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(rows as u64).with_style(style)
}

#[derive(Serialize)]
struct RunReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    template: String,
    data_file: String,
    processed: usize,
    succeeded: usize,
    failed: usize,
    failures: &'a [RowFailure],
}

/// Write the machine-readable run report into the output directory.
pub fn write_run_report_json(
    output_dir: &Path,
    template: &Path,
    data_file: &Path,
    report: &RunReport,
    options: &MergeOptions,
) -> Result<PathBuf> {
    let output_path = output_dir.join(&options.report_filename);
    let payload = RunReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        template: template.display().to_string(),
        data_file: data_file.display().to_string(),
        processed: report.processed,
        succeeded: report.succeeded,
        failed: report.failed(),
        failures: &report.failures,
    };
    let file = File::create(&output_path)
        .with_context(|| format!("create run report {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &payload)
        .with_context(|| format!("write run report {}", output_path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %output_path.display(), "wrote run report");
    Ok(output_path)
}
