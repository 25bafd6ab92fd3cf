use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ScriptError;

/// A logical, relative-path-rooted file system. Relative paths resolve
/// against a configurable base directory; absolute paths pass through.
pub trait FileSystem {
    fn read(&self, path: &str) -> Result<String, ScriptError>;
    fn write(&self, path: &str, content: &str) -> Result<(), ScriptError>;
}

/// Reads/writes the real host file system, rooted at `base_dir`.
pub struct NativeFileSystem {
    base_dir: PathBuf,
}

impl NativeFileSystem {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

impl FileSystem for NativeFileSystem {
    fn read(&self, path: &str) -> Result<String, ScriptError> {
        std::fs::read_to_string(self.resolve(path))
            .map_err(|e| ScriptError::FileSystem { path: path.to_string(), message: e.to_string() })
    }

    fn write(&self, path: &str, content: &str) -> Result<(), ScriptError> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScriptError::FileSystem { path: path.to_string(), message: e.to_string() })?;
        }
        std::fs::write(resolved, content)
            .map_err(|e| ScriptError::FileSystem { path: path.to_string(), message: e.to_string() })
    }
}

/// An in-memory file system, for tests and for sandboxed/remote execution
/// contexts where host file access is undesired.
#[derive(Default)]
pub struct RecordingFileSystem {
    files: Mutex<BTreeMap<String, String>>,
}

impl RecordingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files.lock().unwrap().insert(path.into(), content.into());
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.files.lock().unwrap().clone()
    }
}

impl FileSystem for RecordingFileSystem {
    fn read(&self, path: &str) -> Result<String, ScriptError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ScriptError::FileSystem { path: path.to_string(), message: "no such file".into() })
    }

    fn write(&self, path: &str, content: &str) -> Result<(), ScriptError> {
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_round_trips() {
        let fs = RecordingFileSystem::new();
        fs.write("a.txt", "hi").unwrap();
        assert_eq!(fs.read("a.txt").unwrap(), "hi");
    }

    #[test]
    fn recording_missing_file_errors() {
        let fs = RecordingFileSystem::new();
        assert!(fs.read("missing.txt").is_err());
    }

    #[test]
    fn native_round_trips_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let fs = NativeFileSystem::new(dir.path());
        fs.write("sub/a.txt", "hi").unwrap();
        assert_eq!(fs.read("sub/a.txt").unwrap(), "hi");
    }
}
