//! AcroForm traversal: field discovery and value application.
//!
//! All object access goes through reference resolution so documents
//! that inline dictionaries and documents that reference them behave
//! the same.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use tracing::{debug, warn};

use bulkpdf_model::{FieldDescriptor, FieldKind, FieldMapping, MergeOptions};

/// Follow a reference one level; broken references yield the original
/// object and are handled by the callers' `Option` paths.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, object).as_dict().ok()
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, UTF-8
/// (lossy) otherwise.
fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Encode a value as a PDF text string object. ASCII stays a literal
/// string; anything else becomes UTF-16BE with BOM.
fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn object_to_text(doc: &Document, object: &Object) -> Option<String> {
    match resolve(doc, object) {
        Object::String(bytes, _) => Some(decode_text(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn field_name(doc: &Document, field: &Dictionary) -> Option<String> {
    field
        .get(b"T")
        .ok()
        .and_then(|object| object_to_text(doc, object))
}

fn field_type(doc: &Document, field: &Dictionary) -> Option<String> {
    match field.get(b"FT").ok().map(|object| resolve(doc, object)) {
        Some(Object::Name(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Export states declared under `/AP /N`, for the field itself and for
/// each of its `/Kids` widgets (radio groups keep their states on the
/// kids). Encounter order is preserved, duplicates dropped.
fn button_states(doc: &Document, field: &Dictionary) -> Vec<String> {
    let mut states = Vec::new();
    collect_appearance_states(doc, field, &mut states);
    if let Some(kids) = field
        .get(b"Kids")
        .ok()
        .and_then(|object| resolve(doc, object).as_array().ok())
    {
        for kid in kids {
            if let Some(kid_dict) = resolve_dict(doc, kid) {
                collect_appearance_states(doc, kid_dict, &mut states);
            }
        }
    }
    states
}

fn collect_appearance_states(doc: &Document, widget: &Dictionary, out: &mut Vec<String>) {
    let Some(appearance) = widget
        .get(b"AP")
        .ok()
        .and_then(|object| resolve_dict(doc, object))
    else {
        return;
    };
    let Some(normal) = appearance
        .get(b"N")
        .ok()
        .and_then(|object| resolve_dict(doc, object))
    else {
        return;
    };
    for (key, _) in normal.iter() {
        let state = String::from_utf8_lossy(key).into_owned();
        if !out.contains(&state) {
            out.push(state);
        }
    }
}

/// Option strings declared under `/Opt`, in declared order. Pair
/// entries `[export, display]` yield the display element, matching how
/// operators see the choices in a viewer.
fn choice_options(doc: &Document, field: &Dictionary) -> Vec<String> {
    let Some(options) = field
        .get(b"Opt")
        .ok()
        .and_then(|object| resolve(doc, object).as_array().ok())
    else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in options {
        let value = match resolve(doc, entry) {
            Object::Array(pair) if pair.len() > 1 => object_to_text(doc, &pair[1]),
            Object::Array(pair) => pair.first().and_then(|o| object_to_text(doc, o)),
            other => object_to_text(doc, other),
        };
        if let Some(value) = value {
            out.push(value);
        }
    }
    out
}

fn acroform_fields<'a>(doc: &'a Document) -> Result<Option<&'a Vec<Object>>, String> {
    let catalog = doc.catalog().map_err(|error| error.to_string())?;
    let Some(acroform) = catalog
        .get(b"AcroForm")
        .ok()
        .and_then(|object| resolve_dict(doc, object))
    else {
        return Ok(None);
    };
    Ok(acroform
        .get(b"Fields")
        .ok()
        .and_then(|object| resolve(doc, object).as_array().ok()))
}

/// Discover every named form field, in `/Fields` array order.
pub(crate) fn extract_fields(
    doc: &Document,
    options: &MergeOptions,
) -> Result<Vec<FieldDescriptor>, String> {
    let Some(fields) = acroform_fields(doc)? else {
        return Ok(Vec::new());
    };
    let mut descriptors = Vec::new();
    for entry in fields {
        if !matches!(entry, Object::Reference(_)) {
            // Fill-time mutation addresses fields through their object
            // ids; an inline dictionary would be cataloged here but
            // unfillable later, so reject the template up front.
            return Err("form field is stored inline instead of as an indirect object".to_string());
        }
        let Some(field) = resolve_dict(doc, entry) else {
            continue;
        };
        let Some(name) = field_name(doc, field) else {
            debug!("skipping unnamed form widget");
            continue;
        };
        let descriptor = match field_type(doc, field).as_deref() {
            Some("Btn") => {
                let mut states = button_states(doc, field);
                if states.is_empty() {
                    // No enumerable appearance states; fall back to the
                    // conventional on/off pair.
                    states = vec![options.checkbox_on.clone(), options.checkbox_off.clone()];
                }
                FieldDescriptor::button(name, states)
            }
            Some("Ch") => FieldDescriptor::choice(name, choice_options(doc, field)),
            Some("Tx") | None => FieldDescriptor::text(name),
            Some(other) => {
                debug!(field_type = other, field = %name, "unclassified field type");
                FieldDescriptor {
                    name,
                    kind: FieldKind::Unknown,
                    allowed_values: Vec::new(),
                }
            }
        };
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

struct FillTarget {
    field_id: ObjectId,
    kid_ids: Vec<ObjectId>,
    is_button: bool,
    value: String,
}

/// Write mapped values into a freshly parsed document.
///
/// Buttons get a `/V` name plus a matching `/AS` on the field and each
/// kid widget; everything else gets a `/V` text string. The form's
/// `NeedAppearances` flag is raised so viewers regenerate appearance
/// streams for the new values.
pub(crate) fn apply_mapping(doc: &mut Document, mapping: &FieldMapping) -> Result<(), String> {
    let mut targets = Vec::new();
    {
        let Some(fields) = acroform_fields(doc)? else {
            return Err("document has no form fields".to_string());
        };
        for entry in fields {
            let Object::Reference(field_id) = entry else {
                // Inline field dictionaries cannot be addressed for
                // mutation; a template that was openable never has them.
                warn!("skipping inline field dictionary during fill");
                continue;
            };
            let Some(field) = resolve_dict(doc, entry) else {
                continue;
            };
            let Some(name) = field_name(doc, field) else {
                continue;
            };
            let Some(value) = mapping.get(&name) else {
                continue;
            };
            let kid_ids = field
                .get(b"Kids")
                .ok()
                .and_then(|object| resolve(doc, object).as_array().ok())
                .map(|kids| {
                    kids.iter()
                        .filter_map(|kid| kid.as_reference().ok())
                        .collect()
                })
                .unwrap_or_default();
            targets.push(FillTarget {
                field_id: *field_id,
                kid_ids,
                is_button: field_type(doc, field).as_deref() == Some("Btn"),
                value: value.clone(),
            });
        }
    }
    for target in &targets {
        set_field_value(doc, target)?;
    }
    set_need_appearances(doc)?;
    Ok(())
}

fn set_field_value(doc: &mut Document, target: &FillTarget) -> Result<(), String> {
    let field = doc
        .get_object_mut(target.field_id)
        .and_then(Object::as_dict_mut)
        .map_err(|error| error.to_string())?;
    if target.is_button {
        // Operators sometimes copy the leading slash from field-info
        // output; the export name never includes it.
        let state = target.value.strip_prefix('/').unwrap_or(&target.value);
        field.set("V", Object::Name(state.as_bytes().to_vec()));
        field.set("AS", Object::Name(state.as_bytes().to_vec()));
        let state = state.to_string();
        for kid_id in &target.kid_ids {
            if let Ok(kid) = doc.get_object_mut(*kid_id).and_then(Object::as_dict_mut) {
                kid.set("AS", Object::Name(state.as_bytes().to_vec()));
            }
        }
    } else {
        field.set("V", encode_text(&target.value));
    }
    Ok(())
}

fn set_need_appearances(doc: &mut Document) -> Result<(), String> {
    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|error| error.to_string())?;
    let acroform = doc
        .get_object(root_id)
        .and_then(Object::as_dict)
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .cloned();
    match acroform {
        Some(Object::Reference(id)) => {
            if let Ok(dict) = doc.get_object_mut(id).and_then(Object::as_dict_mut) {
                dict.set("NeedAppearances", true);
            }
        }
        Some(Object::Dictionary(mut dict)) => {
            dict.set("NeedAppearances", true);
            if let Ok(catalog) = doc.get_object_mut(root_id).and_then(Object::as_dict_mut) {
                catalog.set("AcroForm", dict);
            }
        }
        _ => {}
    }
    Ok(())
}
