//! Temporary input files.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary directory that holds test inputs and outputs.
///
/// The directory and everything in it is removed on drop.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Path for a file inside the workspace (not created).
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write raw bytes to `name` and return its path.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        let mut file = std::fs::File::create(&path).expect("Failed to create test file");
        file.write_all(bytes).expect("Failed to write test file");
        path
    }

    /// Write lines joined by '\n' to `name` and return its path.
    pub fn write_lines<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> PathBuf {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        self.write_bytes(name, content.as_bytes())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
