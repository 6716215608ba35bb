//! Schema binding: matching data source headers against the field
//! catalog, once per run, then resolving one mapping per row.

use tracing::warn;

use bulkpdf_model::{
    DataRow, FieldCatalog, FieldMapping, MergeError, MergeOptions, Result,
};

/// The one-time comparison of source headers against catalog fields.
///
/// Resolved once per run and reused for every row; the mismatch sets
/// never change mid-run because the header row is fixed.
#[derive(Debug)]
pub struct SchemaBinding {
    /// Headers that match a catalog field, in catalog order.
    common: Vec<String>,
    /// Catalog fields with no matching header; left at their template
    /// defaults in every output.
    pdf_only: Vec<String>,
    /// Headers (other than the reserved column) matching no field;
    /// their cells are ignored.
    source_only: Vec<String>,
    output_column: String,
}

impl SchemaBinding {
    /// Compare headers against the catalog.
    ///
    /// # Errors
    ///
    /// [`MergeError::MissingRequiredColumn`] when the reserved output
    /// filename column is absent — every row depends on it, so the
    /// whole run is aborted.
    pub fn resolve(
        catalog: &FieldCatalog,
        headers: &[String],
        options: &MergeOptions,
    ) -> Result<Self> {
        if !headers.iter().any(|h| *h == options.output_filename_column) {
            return Err(MergeError::MissingRequiredColumn(
                options.output_filename_column.clone(),
            ));
        }
        let common: Vec<String> = catalog
            .names()
            .filter(|name| headers.iter().any(|h| h == name))
            .map(str::to_string)
            .collect();
        let pdf_only: Vec<String> = catalog
            .names()
            .filter(|name| !headers.iter().any(|h| h == name))
            .map(str::to_string)
            .collect();
        let source_only: Vec<String> = headers
            .iter()
            .filter(|h| {
                !h.is_empty() && **h != options.output_filename_column && !catalog.contains(h)
            })
            .cloned()
            .collect();
        Ok(Self {
            common,
            pdf_only,
            source_only,
            output_column: options.output_filename_column.clone(),
        })
    }

    pub fn common_fields(&self) -> &[String] {
        &self.common
    }

    /// Schema-mismatch warnings, in a stable order. Advisory only:
    /// mismatches never fail a run.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.pdf_only.is_empty() {
            let mut names = self.pdf_only.clone();
            names.sort();
            warnings.push(format!(
                "template fields not found in data source headers: {}",
                names.join(", ")
            ));
        }
        if !self.source_only.is_empty() {
            let mut names = self.source_only.clone();
            names.sort();
            warnings.push(format!(
                "data source headers not found in template fields: {}",
                names.join(", ")
            ));
        }
        if self.common.is_empty() {
            warnings.push(
                "no data source header matches a template field; outputs will be unfilled copies"
                    .to_string(),
            );
        }
        warnings
    }

    /// Log the mismatch warnings once, at run start.
    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            warn!("{warning}");
        }
    }

    /// Resolve one row into a field mapping. Blank cells are omitted
    /// so fields keep their template defaults; non-blank cells are
    /// coerced to deterministic strings. Values are not validated
    /// against allowed-value sets — the field-info artifact is
    /// advisory and the PDF library arbitrates at fill time.
    pub fn bind(&self, row: &DataRow, options: &MergeOptions) -> FieldMapping {
        let mut mapping = FieldMapping::new();
        for field in &self.common {
            let Some(cell) = row.get(field) else {
                continue;
            };
            if let Some(value) = cell.render(&options.checkbox_on, &options.checkbox_off) {
                mapping.insert(field.clone(), value);
            }
        }
        mapping
    }

    /// The row's output filename, trimmed; `None` when blank.
    ///
    /// The cell is read verbatim: a filename cell holding `TRUE` or
    /// `3.0` names the file literally, checkbox and numeric coercion
    /// apply only to mapped field values.
    pub fn output_filename(&self, row: &DataRow) -> Option<String> {
        let value = row.get(&self.output_column)?.literal()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Append the configured extension unless the name already carries it
/// (case-insensitively).
pub fn ensure_pdf_extension(filename: &str, options: &MergeOptions) -> String {
    if filename
        .to_ascii_lowercase()
        .ends_with(&options.pdf_extension.to_ascii_lowercase())
    {
        filename.to_string()
    } else {
        format!("{filename}{}", options.pdf_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use bulkpdf_model::{CellValue, FieldDescriptor};

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::button("attended", vec!["Yes".into(), "Off".into()]),
        ])
        .unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn row(cells: &[(&str, CellValue)]) -> DataRow {
        let map: BTreeMap<String, CellValue> = cells
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        DataRow::new(1, map)
    }

    #[test]
    fn missing_output_column_is_fatal() {
        let result = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "attended"]),
            &MergeOptions::default(),
        );
        assert!(matches!(
            result,
            Err(MergeError::MissingRequiredColumn(column)) if column == "_output_filename"
        ));
    }

    #[test]
    fn mismatches_produce_one_warning_each() {
        let options = MergeOptions::default();
        let binding = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "extra", "_output_filename"]),
            &options,
        )
        .unwrap();
        let warnings = binding.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("attended"));
        assert!(warnings[1].contains("extra"));
        assert_eq!(binding.common_fields(), ["name"]);
    }

    #[test]
    fn fully_matching_schema_warns_nothing() {
        let options = MergeOptions::default();
        let binding = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "attended", "_output_filename"]),
            &options,
        )
        .unwrap();
        assert!(binding.warnings().is_empty());
    }

    #[test]
    fn bind_omits_blank_cells_and_coerces_values() {
        let options = MergeOptions::default();
        let binding = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "attended", "_output_filename"]),
            &options,
        )
        .unwrap();
        let mapping = binding.bind(
            &row(&[
                ("name", CellValue::Empty),
                ("attended", CellValue::classify("TRUE")),
                ("_output_filename", CellValue::Text("alice".into())),
            ]),
            &options,
        );
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("attended"), Some(&"Yes".to_string()));
        assert!(!mapping.contains_key("name"));
        // The reserved column never reaches the mapping.
        assert!(!mapping.contains_key("_output_filename"));
    }

    #[test]
    fn output_filename_trims_and_rejects_blank() {
        let options = MergeOptions::default();
        let binding = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "attended", "_output_filename"]),
            &options,
        )
        .unwrap();
        let named = row(&[("_output_filename", CellValue::Text("alice".into()))]);
        assert_eq!(binding.output_filename(&named), Some("alice".to_string()));
        let blank = row(&[("_output_filename", CellValue::Empty)]);
        assert_eq!(binding.output_filename(&blank), None);
    }

    #[test]
    fn output_filename_is_never_coerced() {
        let options = MergeOptions::default();
        let binding = SchemaBinding::resolve(
            &catalog(),
            &headers(&["name", "attended", "_output_filename"]),
            &options,
        )
        .unwrap();
        // Checkbox and numeric classification apply to field values
        // only; a filename cell keeps its literal text.
        let boolish = row(&[("_output_filename", CellValue::classify("TRUE"))]);
        assert_eq!(binding.output_filename(&boolish), Some("TRUE".to_string()));
        let numeric = row(&[("_output_filename", CellValue::classify("3.0"))]);
        assert_eq!(binding.output_filename(&numeric), Some("3.0".to_string()));
    }

    #[test]
    fn pdf_extension_appended_case_insensitively() {
        let options = MergeOptions::default();
        assert_eq!(ensure_pdf_extension("alice", &options), "alice.pdf");
        assert_eq!(ensure_pdf_extension("alice.pdf", &options), "alice.pdf");
        assert_eq!(ensure_pdf_extension("alice.PDF", &options), "alice.PDF");
    }
}
