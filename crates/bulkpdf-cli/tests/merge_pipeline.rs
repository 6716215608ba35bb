//! End-to-end tests over the two command pipelines.

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, dictionary};

use bulkpdf_cli::pipeline::{FillRequest, run_fill_form, run_generate_template};
use bulkpdf_model::MergeError;

/// A two-field form: one text field and one checkbox.
fn write_survey_form(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let name_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("name"),
    });
    let attended_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal("attended"),
        "AP" => Object::Dictionary(dictionary! {
            "N" => Object::Dictionary(dictionary! {
                "Yes" => Object::Null,
                "Off" => Object::Null,
            }),
        }),
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "Annots" => vec![Object::Reference(name_id), Object::Reference(attended_id)],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => vec![Object::Reference(name_id), Object::Reference(attended_id)],
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "AcroForm" => Object::Reference(acroform_id),
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("save survey form");
}

fn fill_request(template: &Path, data_file: &Path, output_dir: &Path) -> FillRequest {
    FillRequest {
        template: template.to_path_buf(),
        data_file: data_file.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        overwrite: false,
        write_report: true,
        show_progress: false,
    }
}

#[test]
fn generate_template_writes_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("survey.pdf");
    write_survey_form(&template);
    let output_dir = dir.path().join("artifacts");

    let artifacts = run_generate_template(&template, &output_dir).unwrap();

    assert_eq!(artifacts.template_csv, output_dir.join("survey_template.csv"));
    let header = std::fs::read_to_string(&artifacts.template_csv).unwrap();
    assert_eq!(header.trim_end(), "name,attended,_output_filename");

    let field_info = artifacts.field_info.expect("field info for the checkbox");
    let info = std::fs::read_to_string(field_info).unwrap();
    assert!(info.contains("Field 'attended' (Button): expected values: Yes, Off"));
}

#[test]
fn fill_form_writes_documents_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("survey.pdf");
    write_survey_form(&template);
    let data_file = dir.path().join("survey.csv");
    std::fs::write(
        &data_file,
        "name,attended,_output_filename\n\
         Alice,Yes,alice\n\
         Bob,,\n",
    )
    .unwrap();
    let output_dir = dir.path().join("out");

    let result = run_fill_form(&fill_request(&template, &data_file, &output_dir)).unwrap();

    assert_eq!(result.report.processed, 2);
    assert_eq!(result.report.succeeded, 1);
    assert_eq!(result.report.failed(), 1);
    assert_eq!(result.report.failures[0].row_number, 2);
    assert_eq!(result.report.failures[0].reason, "missing output filename");

    let alice = output_dir.join("alice.pdf");
    assert!(alice.exists());
    assert!(Document::load(&alice).is_ok());

    let report_path: PathBuf = result.report_path.expect("report path");
    assert_eq!(report_path, output_dir.join("merge_report.json"));
    let payload: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(payload["schema"], "bulkpdf-run-report");
    assert_eq!(payload["processed"], 2);
    assert_eq!(payload["succeeded"], 1);
    assert_eq!(payload["failed"], 1);
    assert_eq!(payload["failures"][0]["reason"], "missing output filename");
}

#[test]
fn second_run_without_overwrite_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("survey.pdf");
    write_survey_form(&template);
    let data_file = dir.path().join("survey.csv");
    std::fs::write(
        &data_file,
        "name,attended,_output_filename\nAlice,Yes,alice\n",
    )
    .unwrap();
    let output_dir = dir.path().join("out");

    run_fill_form(&fill_request(&template, &data_file, &output_dir)).unwrap();

    // The directory now holds alice.pdf and merge_report.json.
    let error = run_fill_form(&fill_request(&template, &data_file, &output_dir))
        .expect_err("non-empty directory must be fatal without --overwrite");
    assert!(error.to_string().contains("not empty"));

    let mut retry = fill_request(&template, &data_file, &output_dir);
    retry.overwrite = true;
    let result = run_fill_form(&retry).unwrap();
    assert_eq!(result.report.succeeded, 1);
    assert!(result.report.all_succeeded());
}

#[test]
fn missing_template_is_a_template_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("absent.pdf");
    let data_file = dir.path().join("survey.csv");
    std::fs::write(&data_file, "name,_output_filename\nAlice,alice\n").unwrap();

    let error = run_generate_template(&template, &dir.path().join("artifacts"))
        .expect_err("missing template");
    assert!(matches!(
        error.downcast_ref::<MergeError>(),
        Some(MergeError::TemplateRead { .. })
    ));

    let error = run_fill_form(&fill_request(&template, &data_file, &dir.path().join("out")))
        .expect_err("missing template");
    assert!(matches!(
        error.downcast_ref::<MergeError>(),
        Some(MergeError::TemplateRead { .. })
    ));
}

#[test]
fn missing_data_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("survey.pdf");
    write_survey_form(&template);
    let request = fill_request(
        &template,
        &dir.path().join("absent.csv"),
        &dir.path().join("out"),
    );
    let error = run_fill_form(&request).expect_err("missing data file");
    assert!(matches!(
        error.downcast_ref::<MergeError>(),
        Some(MergeError::DataSourceRead { .. })
    ));
}
