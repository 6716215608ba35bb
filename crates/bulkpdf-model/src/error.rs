use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the merge pipeline.
///
/// The first five variants are fatal: they abort a run before any
/// output document is written. Per-row problems (missing output
/// filename, overwrite collisions, backend write failures) are never
/// surfaced through this type; the fill engine records them as
/// [`crate::RowFailure`] entries instead.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("cannot read template '{path}': {reason}")]
    TemplateRead { path: PathBuf, reason: String },

    #[error("duplicate field name '{0}' in template")]
    DuplicateFieldName(String),

    #[error("template field '{0}' collides with the reserved output filename column")]
    ReservedFieldName(String),

    #[error("required column '{0}' not found in data source headers")]
    MissingRequiredColumn(String),

    #[error("cannot read data source '{path}': {reason}")]
    DataSourceRead { path: PathBuf, reason: String },

    #[error("output directory '{path}': {reason}")]
    OutputDirectory { path: PathBuf, reason: String },

    #[error("failed to write '{path}': {reason}")]
    ArtifactWrite { path: PathBuf, reason: String },

    #[error("failed to write filled document '{filename}': {reason}")]
    DocumentWrite { filename: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;
