//! Template documents: loaded once, filled many times.

use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::debug;

use bulkpdf_model::{
    FieldCatalog, FieldMapping, FormWriter, MergeError, MergeOptions, Result,
};

use crate::acroform;

/// A parsed fillable template and its field catalog.
///
/// The raw bytes are retained so every fill re-parses a fresh copy of
/// the original document; the loaded template itself is never mutated.
pub struct FormTemplate {
    path: PathBuf,
    bytes: Vec<u8>,
    catalog: FieldCatalog,
}

impl FormTemplate {
    /// Open a template and extract its field catalog.
    ///
    /// # Errors
    ///
    /// - [`MergeError::TemplateRead`] when the path is missing, the
    ///   document cannot be parsed, or it exposes no form fields;
    /// - [`MergeError::ReservedFieldName`] when a field collides with
    ///   the reserved output filename column;
    /// - [`MergeError::DuplicateFieldName`] when field names repeat.
    pub fn open(path: impl AsRef<Path>, options: &MergeOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MergeError::TemplateRead {
                path: path.to_path_buf(),
                reason: "not found or not a file".to_string(),
            });
        }
        let bytes = std::fs::read(path).map_err(|error| MergeError::TemplateRead {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let document = Document::load_mem(&bytes).map_err(|error| MergeError::TemplateRead {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let fields =
            acroform::extract_fields(&document, options).map_err(|reason| {
                MergeError::TemplateRead {
                    path: path.to_path_buf(),
                    reason,
                }
            })?;
        if fields.is_empty() {
            return Err(MergeError::TemplateRead {
                path: path.to_path_buf(),
                reason: "no fillable form fields found".to_string(),
            });
        }
        for field in &fields {
            if field.name == options.output_filename_column {
                return Err(MergeError::ReservedFieldName(field.name.clone()));
            }
        }
        let catalog = FieldCatalog::new(fields)?;
        debug!(path = %path.display(), fields = catalog.len(), "loaded field catalog");
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            catalog,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }
}

impl FormWriter for FormTemplate {
    fn write_filled(&self, mapping: &FieldMapping, path: &Path) -> Result<()> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let document_write = |reason: String| MergeError::DocumentWrite {
            filename: filename.clone(),
            reason,
        };
        // Fresh parse per row; a shared writable instance would carry
        // prior rows' values forward.
        let mut document = Document::load_mem(&self.bytes)
            .map_err(|error| document_write(error.to_string()))?;
        acroform::apply_mapping(&mut document, mapping).map_err(&document_write)?;
        document
            .save(path)
            .map_err(|error| document_write(error.to_string()))?;
        Ok(())
    }
}
