use crate::ast::parse_go_file;
use crate::error::{Error, Result};
use crate::types::*;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// Whether a file name is Go source that should get a scaffold (not a test file itself).
pub fn is_go_source(file_name: &str) -> bool {
    file_name.ends_with(".go") && !file_name.ends_with("_test.go")
}

fn walk_error(root: &Path, err: ignore::Error) -> Error {
    let message = err.to_string();
    let source = err.into_io_error().unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    Error::fs(root, source)
}

/// Collect Go source files under the configured root in a deterministic order.
///
/// Entries are sorted by file name within each directory; hidden entries and
/// `skip_dirs` are pruned. Ignore files are not consulted.
pub fn find_go_sources(config: &GenerateConfig) -> Result<Vec<PathBuf>> {
    let skip = config.skip_dirs.clone();
    let walker = WalkBuilder::new(&config.root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                return !skip.contains(name.as_ref());
            }
            true
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(&config.root, e))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_go_source(&name) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// Declaration scan
// ---------------------------------------------------------------------------

/// Parse every Go source file under the root and collect declarations in walk order.
///
/// The first unreadable or unparsable file aborts the scan.
pub fn scan_declarations(config: &GenerateConfig) -> Result<ScanResult> {
    let files = find_go_sources(config)?;
    let mut declarations = Vec::new();

    for path in &files {
        let content = fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
        let decls = parse_go_file(path, &content)?;
        debug!(path = %path.display(), count = decls.len(), "Scanned");
        declarations.extend(decls);
    }

    Ok(ScanResult { files, declarations })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
