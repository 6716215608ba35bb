//! Per-row bindings and the end-of-run report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field-name to value mapping for one output document.
///
/// Only non-blank cells whose header matches a catalog field appear
/// here; unmapped fields keep their template defaults.
pub type FieldMapping = BTreeMap<String, String>;

/// One failed row, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-based data row number.
    pub row_number: usize,
    /// Resolved output filename, when the row got that far.
    pub output_filename: Option<String>,
    pub reason: String,
}

/// Aggregate outcome of a fill run.
///
/// Built incrementally by the fill engine; read-only once returned.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Non-blank rows that were processed (succeeded + failed).
    pub processed: usize,
    pub succeeded: usize,
    /// Failed rows in the order they were encountered.
    pub failures: Vec<RowFailure>,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, failure: RowFailure) {
        self.processed += 1;
        self.failures.push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_stay_consistent() {
        let mut report = RunReport::default();
        report.record_success();
        report.record_failure(RowFailure {
            row_number: 2,
            output_filename: None,
            reason: "missing output filename".to_string(),
        });
        report.record_success();
        assert_eq!(report.processed, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_succeeded());
        assert_eq!(report.failures[0].row_number, 2);
    }
}
