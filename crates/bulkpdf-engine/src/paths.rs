//! Filesystem preconditions checked before a run starts.

use std::path::Path;

use tracing::{info, warn};

use bulkpdf_model::{MergeError, Result};

fn input_file_problem(path: &Path) -> Option<String> {
    if !path.exists() {
        return Some("file not found".to_string());
    }
    if !path.is_file() {
        return Some("path is not a file".to_string());
    }
    None
}

/// Verify the template path before opening it. A missing or
/// non-regular template surfaces as [`MergeError::TemplateRead`] so
/// the diagnostic names the right input.
pub fn check_template_file(path: &Path) -> Result<()> {
    match input_file_problem(path) {
        Some(reason) => Err(MergeError::TemplateRead {
            path: path.to_path_buf(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Verify the data source path before reading it.
pub fn check_data_file(path: &Path) -> Result<()> {
    match input_file_problem(path) {
        Some(reason) => Err(MergeError::DataSourceRead {
            path: path.to_path_buf(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Create or validate the output directory.
///
/// When `require_empty` is set (the fill path), a non-empty directory
/// is fatal unless `allow_overwrite` was granted. The
/// template-generation path passes `require_empty = false` and
/// tolerates existing content.
pub fn prepare_output_directory(
    path: &Path,
    require_empty: bool,
    allow_overwrite: bool,
) -> Result<()> {
    let directory_error = |reason: String| MergeError::OutputDirectory {
        path: path.to_path_buf(),
        reason,
    };
    if path.exists() {
        if !path.is_dir() {
            return Err(directory_error("exists but is not a directory".to_string()));
        }
        let non_empty = std::fs::read_dir(path)
            .map_err(|error| directory_error(error.to_string()))?
            .next()
            .is_some();
        if require_empty && non_empty {
            if !allow_overwrite {
                return Err(directory_error(
                    "not empty; pass --overwrite or choose another directory".to_string(),
                ));
            }
            warn!(path = %path.display(), "output directory not empty; files may be overwritten");
        }
        info!(path = %path.display(), "using existing output directory");
    } else {
        std::fs::create_dir_all(path).map_err(|error| directory_error(error.to_string()))?;
        info!(path = %path.display(), "created output directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        prepare_output_directory(&target, true, false).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn non_empty_directory_requires_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("existing.pdf"), b"x").unwrap();
        let denied = prepare_output_directory(dir.path(), true, false);
        assert!(matches!(denied, Err(MergeError::OutputDirectory { .. })));
        prepare_output_directory(dir.path(), true, true).unwrap();
    }

    #[test]
    fn template_path_tolerates_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("existing.txt"), b"x").unwrap();
        prepare_output_directory(dir.path(), false, false).unwrap();
    }

    #[test]
    fn file_in_place_of_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        let result = prepare_output_directory(&file, false, false);
        assert!(matches!(result, Err(MergeError::OutputDirectory { .. })));
    }

    #[test]
    fn input_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.csv");
        std::fs::write(&file, b"a,b\n").unwrap();
        check_data_file(&file).unwrap();
        check_template_file(&file).unwrap();
        assert!(check_data_file(&dir.path().join("missing.csv")).is_err());
        assert!(check_data_file(dir.path()).is_err());
    }

    #[test]
    fn input_checks_name_the_right_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            check_template_file(&missing),
            Err(MergeError::TemplateRead { .. })
        ));
        assert!(matches!(
            check_data_file(&missing),
            Err(MergeError::DataSourceRead { .. })
        ));
    }
}
