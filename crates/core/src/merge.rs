//! Output file merging: route scaffolds to `X_test.go`, one header per file.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Callable, ImportBlock};

/// Companion test path for a Go source file: `dir/x.go` → `dir/x_test.go`.
pub fn test_path_for(source: &Path) -> PathBuf {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    source.with_file_name(format!("{stem}_test.go"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergePolicy {
    /// Replace an existing destination file. When off, such paths are skipped entirely.
    pub overwrite: bool,
    /// Copy the source file's import blocks under the header.
    pub copy_imports: bool,
}

const TESTING_SPEC: &str = "\"testing\"";

/// A carried import block minus any unaliased `"testing"` spec, which the header
/// already imports. `None` when nothing else is left.
fn without_testing(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.strip_prefix("import").map(str::trim) == Some(TESTING_SPEC) {
        return None;
    }
    if !trimmed.contains('(') {
        return Some(raw.to_string());
    }
    let kept: Vec<&str> = raw.lines().filter(|line| line.trim() != TESTING_SPEC).collect();
    let has_specs = kept.iter().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with("import") && line != ")" && !line.starts_with("//")
    });
    has_specs.then(|| kept.join("\n"))
}

/// A test file being assembled during one run.
#[derive(Debug)]
struct OutputFile {
    path: PathBuf,
    package: String,
    header_emitted: bool,
    blocks: Vec<String>,
}

impl OutputFile {
    fn open(path: PathBuf, package: &str) -> Self {
        Self { path, package: package.to_string(), header_emitted: false, blocks: Vec::new() }
    }

    fn emit_header(&mut self, imports: &[&ImportBlock]) {
        if self.header_emitted {
            return;
        }
        let mut header = format!("package {}\n\nimport \"testing\"\n", self.package);
        for block in imports.iter().filter_map(|import| without_testing(&import.raw_text)) {
            header.push('\n');
            header.push_str(&block);
            header.push('\n');
        }
        self.blocks.push(header);
        self.header_emitted = true;
    }

    fn render(&self) -> String {
        self.blocks.join("\n")
    }
}

/// Files written and paths left alone by [`Merger::flush`].
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Groups scaffolds by destination path for a single run.
///
/// The first scaffold routed to a path decides its fate: either the file is opened
/// (header emitted once) or, with overwrite off and the file present on disk, the path
/// is skipped for the rest of the run.
#[derive(Debug, Default)]
pub struct Merger {
    policy: MergePolicy,
    files: Vec<OutputFile>,
    opened: HashMap<PathBuf, usize>,
    skipped: BTreeSet<PathBuf>,
}

impl Merger {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy, ..Default::default() }
    }

    /// Route one scaffold block. Returns `false` when the destination is skipped.
    pub fn add(&mut self, func: &Callable, imports: &[&ImportBlock], block: String) -> bool {
        let path = test_path_for(&func.file_path);

        if self.skipped.contains(&path) {
            return false;
        }

        let idx = match self.opened.get(&path) {
            Some(&idx) => idx,
            None => {
                if !self.policy.overwrite && path.exists() {
                    debug!(path = %path.display(), "Test file exists, skipping");
                    self.skipped.insert(path);
                    return false;
                }
                let mut file = OutputFile::open(path.clone(), &func.package);
                let carried: &[&ImportBlock] = if self.policy.copy_imports { imports } else { &[] };
                file.emit_header(carried);
                self.files.push(file);
                self.opened.insert(path, self.files.len() - 1);
                self.files.len() - 1
            }
        };

        self.files[idx].blocks.push(block);
        true
    }

    /// Write every opened file (create or truncate) in first-seen order.
    pub fn flush(self) -> Result<MergeOutcome> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in self.files {
            std::fs::write(&file.path, file.render()).map_err(|e| Error::fs(&file.path, e))?;
            info!(path = %file.path.display(), scaffolds = file.blocks.len() - 1, "Wrote test file");
            written.push(file.path);
        }
        Ok(MergeOutcome { written, skipped: self.skipped.into_iter().collect() })
    }
}
