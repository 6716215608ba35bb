//! lopdf-backed PDF form access for bulkpdf.
//!
//! [`FormTemplate`] owns one parsed template: it exposes the field
//! catalog for schema projection and row binding, and implements
//! [`bulkpdf_model::FormWriter`] by filling a fresh copy of the
//! template per output document.

mod acroform;
mod template;

pub use template::FormTemplate;
