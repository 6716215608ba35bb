//! Seam between the fill engine and the PDF backend.

use std::path::Path;

use crate::error::Result;
use crate::report::FieldMapping;

/// Produces one filled document per call.
///
/// Contract: every call must fill a fresh copy of the original
/// template's full structure, independent of prior fills. Mutating one
/// shared writable instance across rows would carry earlier rows'
/// values into later documents and is explicitly disallowed.
pub trait FormWriter {
    /// Write a filled copy of the template to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::DocumentWrite`] when the copy
    /// cannot be produced or written; the engine records this as a
    /// row-level failure and continues.
    fn write_filled(&self, mapping: &FieldMapping, path: &Path) -> Result<()>;
}
