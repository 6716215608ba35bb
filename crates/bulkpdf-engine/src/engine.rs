//! The fill run: one filled document per data row, one report per run.
//!
//! The run is a straight line — prepare the output directory, resolve
//! the schema binding once, then walk the rows in source order. Fatal
//! conditions abort before any document is written; everything that
//! goes wrong inside a row is recorded and the run moves on.

use std::path::Path;

use tracing::{debug, info, warn};

use bulkpdf_ingest::DataSource;
use bulkpdf_model::{
    DataRow, FieldCatalog, FormWriter, MergeOptions, Result, RowFailure, RunReport,
};

use crate::binding::{SchemaBinding, ensure_pdf_extension};
use crate::paths::prepare_output_directory;

/// Overwrite permissions for one run.
///
/// The directory gate and the per-file check are separate decisions:
/// the first admits the run into a non-empty directory at all, the
/// second governs individual filename collisions inside it.
#[derive(Debug, Clone, Copy)]
pub struct OverwritePolicy {
    pub allow_non_empty_directory: bool,
    pub replace_existing_files: bool,
}

impl OverwritePolicy {
    /// Both permissions from one CLI flag.
    pub fn from_flag(overwrite: bool) -> Self {
        Self {
            allow_non_empty_directory: overwrite,
            replace_existing_files: overwrite,
        }
    }
}

/// What happened to one row. Surfaced to observers (the CLI progress
/// bar) as the run advances.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// Fully blank row; counts as neither success nor failure.
    Skipped { row_number: usize },
    Succeeded {
        row_number: usize,
        filename: String,
    },
    Failed {
        row_number: usize,
        filename: Option<String>,
        reason: String,
    },
}

/// Orchestrates a fill run over one template and one data source.
pub struct FillEngine<'a> {
    options: &'a MergeOptions,
}

impl<'a> FillEngine<'a> {
    pub fn new(options: &'a MergeOptions) -> Self {
        Self { options }
    }

    /// Run without an observer.
    pub fn run<W: FormWriter>(
        &self,
        catalog: &FieldCatalog,
        writer: &W,
        source: &DataSource,
        output_dir: &Path,
        policy: OverwritePolicy,
    ) -> Result<RunReport> {
        self.run_with(catalog, writer, source, output_dir, policy, |_| {})
    }

    /// Run, reporting each row's outcome to `observe`.
    ///
    /// # Errors
    ///
    /// Fatal only: output directory problems and a missing reserved
    /// column. Row-level failures land in the returned report.
    pub fn run_with<W: FormWriter>(
        &self,
        catalog: &FieldCatalog,
        writer: &W,
        source: &DataSource,
        output_dir: &Path,
        policy: OverwritePolicy,
        mut observe: impl FnMut(&RowOutcome),
    ) -> Result<RunReport> {
        prepare_output_directory(output_dir, true, policy.allow_non_empty_directory)?;
        let binding = SchemaBinding::resolve(catalog, source.headers(), self.options)?;
        binding.log_warnings();
        info!(
            rows = source.len(),
            fields = binding.common_fields().len(),
            output_dir = %output_dir.display(),
            "starting fill run"
        );

        let mut report = RunReport::default();
        for row in source.rows() {
            let outcome = self.process_row(&binding, writer, row, output_dir, policy);
            match &outcome {
                RowOutcome::Skipped { row_number } => {
                    debug!(row = row_number, "skipping blank row");
                }
                RowOutcome::Succeeded {
                    row_number,
                    filename,
                } => {
                    debug!(row = row_number, filename = %filename, "row filled");
                    report.record_success();
                }
                RowOutcome::Failed {
                    row_number,
                    filename,
                    reason,
                } => {
                    warn!(row = row_number, reason = %reason, "row failed");
                    report.record_failure(RowFailure {
                        row_number: *row_number,
                        output_filename: filename.clone(),
                        reason: reason.clone(),
                    });
                }
            }
            observe(&outcome);
        }
        info!(
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed(),
            "fill run complete"
        );
        Ok(report)
    }

    fn process_row<W: FormWriter>(
        &self,
        binding: &SchemaBinding,
        writer: &W,
        row: &DataRow,
        output_dir: &Path,
        policy: OverwritePolicy,
    ) -> RowOutcome {
        if row.is_blank() {
            return RowOutcome::Skipped {
                row_number: row.row_number,
            };
        }
        let Some(raw_name) = binding.output_filename(row) else {
            return RowOutcome::Failed {
                row_number: row.row_number,
                filename: None,
                reason: "missing output filename".to_string(),
            };
        };
        let filename = ensure_pdf_extension(&raw_name, self.options);
        let output_path = output_dir.join(&filename);
        if output_path.exists() && !policy.replace_existing_files {
            return RowOutcome::Failed {
                row_number: row.row_number,
                filename: Some(filename),
                reason: "output exists, overwrite disabled".to_string(),
            };
        }
        let mapping = binding.bind(row, self.options);
        match writer.write_filled(&mapping, &output_path) {
            Ok(()) => RowOutcome::Succeeded {
                row_number: row.row_number,
                filename,
            },
            Err(error) => RowOutcome::Failed {
                row_number: row.row_number,
                filename: Some(filename),
                reason: error.to_string(),
            },
        }
    }
}
