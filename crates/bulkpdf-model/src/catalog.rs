//! Field catalog: the classified form fields of one PDF template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

/// Classification of a form field's widget type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free-text entry.
    Text,
    /// Checkbox or radio button group.
    Button,
    /// Dropdown or list box.
    Choice,
    /// Anything the extractor could not classify (signatures etc.).
    Unknown,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Button => "Button",
            FieldKind::Choice => "Choice",
            FieldKind::Unknown => "Unknown",
        }
    }
}

/// One fillable field discovered in a PDF template.
///
/// Immutable after catalog construction; `allowed_values` is populated
/// only for `Button` (export states) and `Choice` (option strings)
/// fields, in the order the source document declares them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub allowed_values: Vec<String>,
}

impl FieldDescriptor {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            allowed_values: Vec::new(),
        }
    }

    pub fn button(name: impl Into<String>, states: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Button,
            allowed_values: states,
        }
    }

    pub fn choice(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Choice,
            allowed_values: options,
        }
    }
}

/// Ordered collection of the fields of one template, keyed by name.
///
/// Iteration order matches the order fields appear in the source
/// document; that order becomes the spreadsheet column order, so it is
/// part of the public contract.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
    by_name: BTreeMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog from fields in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::DuplicateFieldName`] when two fields share
    /// a name; uniqueness is an invariant every downstream component
    /// relies on.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for (index, field) in fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(MergeError::DuplicateFieldName(field.name.clone()));
            }
        }
        Ok(Self { fields, by_name })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|index| &self.fields[*index])
    }

    /// Fields in source-document order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Field names in source-document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}
