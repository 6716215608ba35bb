//! Schema projection: turn a field catalog into the operator-facing
//! template artifacts.
//!
//! The column order of the generated template is a public contract —
//! it is the catalog's discovery order with the reserved output
//! filename column appended last.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use bulkpdf_model::{FieldCatalog, FieldDescriptor, FieldKind, MergeError, MergeOptions, Result};

/// Spreadsheet headers for the catalog: field names in catalog order,
/// reserved output column last.
pub fn project_headers(catalog: &FieldCatalog, options: &MergeOptions) -> Vec<String> {
    let mut headers: Vec<String> = catalog.names().map(str::to_string).collect();
    headers.push(options.output_filename_column.clone());
    headers
}

/// Fields that need explanation in the field-info artifact: Button and
/// Choice fields, in catalog order. Text fields are omitted.
pub fn project_field_info<'a>(catalog: &'a FieldCatalog) -> Vec<&'a FieldDescriptor> {
    catalog
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Button | FieldKind::Choice))
        .collect()
}

/// One line of the field-info artifact.
fn field_info_line(field: &FieldDescriptor) -> String {
    if field.allowed_values.is_empty() {
        format!(
            "Field '{}' ({}): check the PDF for accepted values",
            field.name,
            field.kind.label()
        )
    } else {
        format!(
            "Field '{}' ({}): expected values: {}",
            field.name,
            field.kind.label(),
            field.allowed_values.join(", ")
        )
    }
}

/// Paths of the generated artifacts.
#[derive(Debug)]
pub struct TemplateArtifacts {
    pub template_csv: PathBuf,
    /// Absent when the catalog has no Button or Choice fields.
    pub field_info: Option<PathBuf>,
}

/// Write the CSV template and, when non-text fields exist, the
/// field-info text file into `output_dir`. Artifact names derive from
/// the template PDF's file stem plus the configured suffixes.
pub fn write_template_files(
    catalog: &FieldCatalog,
    template_path: &Path,
    output_dir: &Path,
    options: &MergeOptions,
) -> Result<TemplateArtifacts> {
    let base = template_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());

    let template_csv = output_dir.join(format!("{base}{}", options.template_suffix));
    write_header_csv(catalog, &template_csv, options)?;
    info!(path = %template_csv.display(), "generated spreadsheet template");

    let infos = project_field_info(catalog);
    let field_info = if infos.is_empty() {
        debug!("no non-text fields; skipping field info artifact");
        None
    } else {
        let path = output_dir.join(format!("{base}{}", options.field_info_suffix));
        write_field_info(&infos, &path, options)?;
        info!(path = %path.display(), "generated field info file");
        Some(path)
    };

    Ok(TemplateArtifacts {
        template_csv,
        field_info,
    })
}

fn write_header_csv(catalog: &FieldCatalog, path: &Path, options: &MergeOptions) -> Result<()> {
    let artifact_write = |reason: String| MergeError::ArtifactWrite {
        path: path.to_path_buf(),
        reason,
    };
    let mut writer = csv::Writer::from_path(path).map_err(|error| artifact_write(error.to_string()))?;
    writer
        .write_record(project_headers(catalog, options))
        .map_err(|error| artifact_write(error.to_string()))?;
    writer
        .flush()
        .map_err(|error| artifact_write(error.to_string()))?;
    Ok(())
}

fn write_field_info(
    infos: &[&FieldDescriptor],
    path: &Path,
    options: &MergeOptions,
) -> Result<()> {
    let artifact_write = |error: std::io::Error| MergeError::ArtifactWrite {
        path: path.to_path_buf(),
        reason: error.to_string(),
    };
    let mut file = std::fs::File::create(path).map_err(artifact_write)?;
    writeln!(file, "Expected values for non-text form fields.").map_err(artifact_write)?;
    writeln!(
        file,
        "Checkbox and radio values are export states; '{}' clears the field.",
        options.checkbox_off
    )
    .map_err(artifact_write)?;
    writeln!(file, "If unsure, test with a single row first.").map_err(artifact_write)?;
    writeln!(file, "=========================================================")
        .map_err(artifact_write)?;
    writeln!(file).map_err(artifact_write)?;
    for info in infos {
        writeln!(file, "{}", field_info_line(info)).map_err(artifact_write)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkpdf_model::FieldDescriptor;

    fn sample_catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::button("attended", vec!["Yes".into(), "Off".into()]),
            FieldDescriptor::choice("color", vec!["Red".into(), "Blue".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn headers_end_with_reserved_column() {
        let options = MergeOptions::default();
        let headers = project_headers(&sample_catalog(), &options);
        assert_eq!(headers.len(), 4);
        assert_eq!(headers, vec!["name", "attended", "color", "_output_filename"]);
        assert_eq!(headers.last().unwrap(), "_output_filename");
    }

    #[test]
    fn field_info_omits_text_fields() {
        let catalog = sample_catalog();
        let infos = project_field_info(&catalog);
        let names: Vec<&str> = infos.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["attended", "color"]);
    }

    #[test]
    fn field_info_line_lists_allowed_values() {
        let field = FieldDescriptor::button("attended", vec!["Yes".into(), "Off".into()]);
        assert_eq!(
            field_info_line(&field),
            "Field 'attended' (Button): expected values: Yes, Off"
        );
    }
}
