//! Shared data model for the bulkpdf mail-merge pipeline.

pub mod catalog;
pub mod error;
pub mod options;
pub mod report;
pub mod row;
pub mod writer;

pub use catalog::{FieldCatalog, FieldDescriptor, FieldKind};
pub use error::{MergeError, Result};
pub use options::MergeOptions;
pub use report::{FieldMapping, RowFailure, RunReport};
pub use row::{CellValue, DataRow};
pub use writer::FormWriter;
