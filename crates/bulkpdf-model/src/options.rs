//! Merge conventions carried as explicit configuration.
//!
//! The reserved column name, artifact suffixes, and checkbox tokens are
//! passed into the engine and projector rather than read from module
//! globals, so runs with different conventions can coexist.

use serde::{Deserialize, Serialize};

/// Naming and coercion conventions for one merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Reserved header naming the output document for each row.
    pub output_filename_column: String,
    /// Extension appended to output filenames that lack it.
    pub pdf_extension: String,
    /// Export value written for checked checkbox cells.
    pub checkbox_on: String,
    /// Export value written for unchecked checkbox cells. Also the PDF
    /// sentinel for the unset state.
    pub checkbox_off: String,
    /// Suffix for the generated spreadsheet template artifact.
    pub template_suffix: String,
    /// Suffix for the generated field-info text artifact.
    pub field_info_suffix: String,
    /// Filename for the machine-readable run report.
    pub report_filename: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output_filename_column: "_output_filename".to_string(),
            pdf_extension: ".pdf".to_string(),
            checkbox_on: "Yes".to_string(),
            checkbox_off: "Off".to_string(),
            template_suffix: "_template.csv".to_string(),
            field_info_suffix: "_field_info.txt".to_string(),
            report_filename: "merge_report.json".to_string(),
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_filename_column(mut self, name: impl Into<String>) -> Self {
        self.output_filename_column = name.into();
        self
    }

    #[must_use]
    pub fn with_checkbox_tokens(
        mut self,
        on: impl Into<String>,
        off: impl Into<String>,
    ) -> Self {
        self.checkbox_on = on.into();
        self.checkbox_off = off.into();
        self
    }
}
