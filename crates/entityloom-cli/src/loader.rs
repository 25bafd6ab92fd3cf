use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Scans `paths` (files or directories) for `*.yaml`/`*.yml` documents and
/// reads each into a `filename -> content` bundle, sorted by filename so
/// load order is deterministic.
pub fn load_bundle(paths: &[PathBuf]) -> Result<BTreeMap<String, String>, CliError> {
    let files = discover_yaml_files(paths)?;
    let mut bundle = BTreeMap::new();
    for file in &files {
        let content = std::fs::read_to_string(file).map_err(|e| CliError::Io { path: file.clone(), source: e })?;
        let name = file_name(file);
        bundle.insert(name, content);
    }
    Ok(bundle)
}

fn discover_yaml_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for ext in ["yaml", "yml"] {
                let pattern = format!("{}/**/*.{ext}", path.display());
                let entries = glob::glob(&pattern).map_err(|e| CliError::StartupLoad { message: e.to_string() })?;
                for entry in entries {
                    let entry = entry.map_err(|e| CliError::StartupLoad { message: e.to_string() })?;
                    files.push(entry);
                }
            }
        } else {
            return Err(CliError::NoFilesMatched { path: path.clone() });
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_files_from_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.yaml"), "b: 1").unwrap();
        std::fs::write(dir.path().join("a.yml"), "a: 1").unwrap();
        let bundle = load_bundle(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(bundle.len(), 2);
        assert!(bundle.contains_key("a.yml"));
        assert!(bundle.contains_key("b.yaml"));
    }

    #[test]
    fn accepts_direct_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.yaml");
        std::fs::write(&path, "x: 1").unwrap();
        let bundle = load_bundle(&[path]).unwrap();
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn nonexistent_path_errors() {
        let result = load_bundle(&[PathBuf::from("/nonexistent/path")]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_is_empty_bundle() {
        let bundle = load_bundle(&[]).unwrap();
        assert!(bundle.is_empty());
    }
}
