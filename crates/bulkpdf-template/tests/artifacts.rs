use std::path::Path;

use bulkpdf_model::{FieldCatalog, FieldDescriptor, MergeOptions};
use bulkpdf_template::write_template_files;

fn catalog_with_checkbox() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDescriptor::text("name"),
        FieldDescriptor::button("attended", vec!["Yes".into(), "Off".into()]),
    ])
    .unwrap()
}

#[test]
fn writes_template_csv_and_field_info() {
    let dir = tempfile::tempdir().unwrap();
    let options = MergeOptions::default();
    let artifacts = write_template_files(
        &catalog_with_checkbox(),
        Path::new("/forms/registration.pdf"),
        dir.path(),
        &options,
    )
    .unwrap();

    assert_eq!(
        artifacts.template_csv,
        dir.path().join("registration_template.csv")
    );
    let csv = std::fs::read_to_string(&artifacts.template_csv).unwrap();
    assert_eq!(csv.trim_end(), "name,attended,_output_filename");

    let info_path = artifacts.field_info.expect("field info artifact");
    assert_eq!(info_path, dir.path().join("registration_field_info.txt"));
    let info = std::fs::read_to_string(&info_path).unwrap();
    assert!(info.contains("Field 'attended' (Button): expected values: Yes, Off"));
    assert!(!info.contains("Field 'name'"));
}

#[test]
fn all_text_catalog_skips_field_info() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = FieldCatalog::new(vec![
        FieldDescriptor::text("name"),
        FieldDescriptor::text("city"),
    ])
    .unwrap();
    let artifacts = write_template_files(
        &catalog,
        Path::new("plain.pdf"),
        dir.path(),
        &MergeOptions::default(),
    )
    .unwrap();
    assert!(artifacts.field_info.is_none());
    assert!(artifacts.template_csv.exists());
}
