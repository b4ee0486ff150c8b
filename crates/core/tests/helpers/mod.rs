//! Test harness for end-to-end generation tests.
//!
//! Copies a fixture Go project into a temp dir and drives `run_generate()` directly
//! (no subprocess). Post-processing goes through a recorder instead of real Go tools.

#![allow(dead_code)]

pub mod fixtures;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tabletest_core::error::Result;
use tabletest_core::tools::PostProcessor;
use tabletest_core::types::{GenerateConfig, RunReport};
use tempfile::TempDir;

/// Records every path handed to it; never touches the files.
#[derive(Default)]
pub struct RecordingPostProcessor {
    pub seen: RefCell<Vec<PathBuf>>,
}

impl PostProcessor for RecordingPostProcessor {
    fn process(&self, path: &Path) -> Result<()> {
        self.seen.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

pub struct TestHarness {
    pub config: GenerateConfig,
    pub post: RecordingPostProcessor,
    _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a harness from a named fixture directory under `tests/fixtures`.
    pub fn from_fixture(name: &str) -> Self {
        let fixture_src = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fixtures::copy_dir_recursive(&fixture_src, temp_dir.path());

        Self {
            config: GenerateConfig::new(temp_dir.path().to_path_buf()),
            post: RecordingPostProcessor::default(),
            _temp_dir: temp_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn generate(&self) -> Result<RunReport> {
        tabletest_core::run_generate(&self.config, &self.post)
    }

    /// Read a file relative to the fixture root.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root().join(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }
}
