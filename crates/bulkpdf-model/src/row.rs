//! Data rows and typed cell values.

use std::collections::BTreeMap;

/// A single spreadsheet cell, classified at ingest time.
///
/// CSV cells arrive as untyped text, so classification recognizes the
/// typed shapes the merge cares about: booleans become checkbox
/// tokens, and integers exported with a trailing fractional-zero tail
/// (`"3.0"`) render without it. Anything else passes through
/// unchanged, which keeps the coercion lossless. The typed variants
/// retain the trimmed source text so cells that name things (the
/// output filename column) can bypass coercion entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool { value: bool, raw: String },
    Integer { value: i64, raw: String },
    Text(String),
}

impl CellValue {
    /// Classify one raw cell.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool {
                value: true,
                raw: trimmed.to_string(),
            };
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool {
                value: false,
                raw: trimmed.to_string(),
            };
        }
        if let Some(integer) = parse_integer_with_zero_tail(trimmed) {
            return CellValue::Integer {
                value: integer,
                raw: trimmed.to_string(),
            };
        }
        CellValue::Text(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell as the string written into a PDF field.
    ///
    /// Returns `None` for empty cells so the field keeps its template
    /// default instead of being forced to an empty string.
    pub fn render(&self, checkbox_on: &str, checkbox_off: &str) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool { value: true, .. } => Some(checkbox_on.to_string()),
            CellValue::Bool { value: false, .. } => Some(checkbox_off.to_string()),
            CellValue::Integer { value, .. } => Some(value.to_string()),
            CellValue::Text(value) => Some(value.clone()),
        }
    }

    /// The cell's literal text, untouched by checkbox or numeric
    /// coercion. Used for the output filename column, where a cell
    /// holding `TRUE` or `3.0` must name the file verbatim.
    pub fn literal(&self) -> Option<&str> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool { raw, .. } | CellValue::Integer { raw, .. } => Some(raw),
            CellValue::Text(value) => Some(value),
        }
    }
}

/// Recognize `-?digits.0+` and nothing else.
///
/// Forms like `007` or `1.50` stay textual: re-rendering them would
/// alter the operator's input.
fn parse_integer_with_zero_tail(value: &str) -> Option<i64> {
    let (mantissa, tail) = value.split_once('.')?;
    if tail.is_empty() || !tail.bytes().all(|b| b == b'0') {
        return None;
    }
    let digits = mantissa.strip_prefix('-').unwrap_or(mantissa);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    mantissa.parse().ok()
}

/// One operator-entered row of the data source.
#[derive(Debug, Clone)]
pub struct DataRow {
    /// 1-based position among the data rows, used for diagnostics.
    pub row_number: usize,
    cells: BTreeMap<String, CellValue>,
}

impl DataRow {
    pub fn new(row_number: usize, cells: BTreeMap<String, CellValue>) -> Self {
        Self { row_number, cells }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    /// True when no cell holds a non-blank value. Fully blank rows are
    /// skipped by the fill engine and count as neither success nor
    /// failure.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}
