//! Row binding and fill-run orchestration for bulkpdf.

pub mod binding;
pub mod engine;
pub mod paths;

pub use binding::{SchemaBinding, ensure_pdf_extension};
pub use engine::{FillEngine, OverwritePolicy, RowOutcome};
pub use paths::{check_data_file, check_template_file, prepare_output_directory};
