//! Tabular data source for the fill path.
//!
//! Reads an operator-populated CSV file into memory: one normalized
//! header row plus [`DataRow`]s with typed cells. Batch runs are small
//! enough that streaming buys nothing, and knowing the row count up
//! front lets the CLI size its progress bar.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use bulkpdf_model::{CellValue, DataRow, MergeError, Result};

/// Trim surrounding whitespace and a BOM, collapse inner whitespace
/// runs to single spaces.
fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// One loaded data source: headers plus data rows in file order.
#[derive(Debug, Clone)]
pub struct DataSource {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataSource {
    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// [`MergeError::DataSourceRead`] when the file is missing,
    /// unreadable, malformed, or has no usable header row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_error = |reason: String| MergeError::DataSourceRead {
            path: path.to_path_buf(),
            reason,
        };
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|error| read_error(error.to_string()))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|error| read_error(error.to_string()))?
            .iter()
            .map(normalize_header)
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(read_error("no usable headers in the first row".to_string()));
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|error| read_error(error.to_string()))?;
            // Flexible parsing: short records leave trailing headers
            // blank, surplus cells are dropped with a warning.
            if record.len() > headers.len() {
                warn!(
                    row = index + 1,
                    cells = record.len(),
                    headers = headers.len(),
                    "row has more cells than headers; extras ignored"
                );
            }
            let mut cells = BTreeMap::new();
            for (column, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let raw = record.get(column).unwrap_or("");
                cells.insert(header.clone(), CellValue::classify(raw));
            }
            rows.push(DataRow::new(index + 1, cells));
        }
        debug!(path = %path.display(), rows = rows.len(), "loaded data source");
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order, 1-based `row_number`s.
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_strips_bom_and_collapses_whitespace() {
        assert_eq!(normalize_header("\u{feff}name"), "name");
        assert_eq!(normalize_header("  first   name "), "first name");
        assert_eq!(normalize_header("plain"), "plain");
    }
}
