use log::debug;
use std::path::{Path, PathBuf};

use super::BatchError;

/// Discover raw export files in `dir`
///
/// Selects regular files with a `.txt`/`.TXT` extension (case-insensitive),
/// sorts them by file name so batch order is stable across platforms, and
/// truncates to the first `max_files` when a limit is given.
pub fn discover_inputs(dir: &Path, max_files: Option<usize>) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::InputDir {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_txt = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if is_txt {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if let Some(max) = max_files {
        files.truncate(max);
    }

    debug!("discovered {} input files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovers_txt_files_sorted_and_truncated() {
        let dir = tempdir().unwrap();
        for name in ["c_run.txt", "a_run.TXT", "b_run.txt", "notes.md", "raw.dat"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let all = discover_inputs(dir.path(), None).unwrap();
        let names: Vec<_> = all
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a_run.TXT", "b_run.txt", "c_run.txt"]);

        let first_two = discover_inputs(dir.path(), Some(2)).unwrap();
        assert_eq!(first_two.len(), 2);
        assert!(first_two[0].ends_with("a_run.TXT"));
    }

    #[test]
    fn rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = discover_inputs(&missing, None).unwrap_err();
        assert!(matches!(err, BatchError::InputDir { .. }));
    }
}
