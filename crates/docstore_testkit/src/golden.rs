//! Golden test utilities for format verification.
//!
//! Provides helpers for verifying that snapshot output matches
//! expected golden files.

use std::fs;
use std::path::{Path, PathBuf};

/// A golden test that compares output against expected files.
pub struct GoldenTest {
    name: String,
    golden_dir: PathBuf,
    update_mode: bool,
}

impl GoldenTest {
    /// Creates a new golden test.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the test (used for file naming)
    /// * `golden_dir` - Directory containing golden files
    pub fn new(name: impl Into<String>, golden_dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            golden_dir: golden_dir.as_ref().to_path_buf(),
            update_mode: std::env::var("UPDATE_GOLDEN").is_ok(),
        }
    }

    /// Creates a golden test using this crate's `tests/golden` directory.
    pub fn with_default_dir(name: impl Into<String>) -> Self {
        let golden_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("golden");

        Self::new(name, golden_dir)
    }

    /// Asserts that the given bytes match the golden file.
    ///
    /// If `UPDATE_GOLDEN` environment variable is set, updates the golden file instead.
    pub fn assert_bytes(&self, suffix: &str, actual: &[u8]) {
        self.assert_text(suffix, &String::from_utf8_lossy(actual));
    }

    /// Asserts that the given string matches the golden file.
    ///
    /// Line endings are normalized before comparing.
    pub fn assert_text(&self, suffix: &str, actual: &str) {
        let path = self.file_path(suffix);

        if self.update_mode {
            self.update_golden_file(&path, actual.as_bytes());
            return;
        }

        if !path.exists() {
            panic!(
                "Golden file not found: {:?}\n\
                 Run with UPDATE_GOLDEN=1 to create it.\n\
                 Actual:\n{}",
                path, actual
            );
        }

        let expected = fs::read_to_string(&path).expect("Failed to read golden file");

        if normalize(actual) != normalize(&expected) {
            panic!(
                "Golden test '{}' failed for '{}':\n\
                 --- Expected ---\n{}\n\
                 --- Actual ---\n{}\n\
                 Run with UPDATE_GOLDEN=1 to update.",
                self.name, suffix, expected, actual
            );
        }
    }

    fn file_path(&self, suffix: &str) -> PathBuf {
        let filename = if suffix.is_empty() {
            format!("{}.golden", self.name)
        } else {
            format!("{}_{}.golden", self.name, suffix)
        };
        self.golden_dir.join(filename)
    }

    fn update_golden_file(&self, path: &Path, data: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create golden directory");
        }
        fs::write(path, data).expect("Failed to write golden file");
        println!("Updated golden file: {:?}", path);
    }
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim_end().to_string()
}
