//! CLI library components for bulkpdf.

pub mod logging;
pub mod pipeline;
