//! tabletest: table-driven test scaffolding for Go packages.
//!
//! Scans a tree of Go source files, extracts every top-level declaration, and writes a
//! `func TestX(t *testing.T)` skeleton for each free function into the companion
//! `_test.go` file.
//!
//! # Modules
//!
//! - [`scan`]: File discovery and per-file declaration collection
//! - [`ast`]: tree-sitter parsing of Go source into declarations
//! - [`signature`]: Parameter/result list decomposition into slots
//! - [`abbrev`]: Short field names derived from type names
//! - [`stubs`]: Payload struct, scenario table and runner loop synthesis
//! - [`merge`]: Routing scaffolds into `_test.go` files
//! - [`tools`]: Formatter/import-organizer post-processing and tool installation
//! - [`types`]: Core types shared across the crate
//! - [`error`]: The crate error type

pub mod abbrev;
pub mod ast;
pub mod error;
pub mod merge;
pub mod scan;
pub mod signature;
pub mod stubs;
pub mod tools;
pub mod types;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use error::{Error, Result};
use merge::{MergePolicy, Merger};
use tools::PostProcessor;
use types::*;

// ---------------------------------------------------------------------------
// .tabletest.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.tabletest.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["skip_dirs", "overwrite", "copy_imports", "format", "formatter", "import_organizer"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn warn_unknown_key(key: &str) {
    let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
    match suggestion {
        Some(s) if edit_distance(key, s) <= 3 => {
            warn!(key, suggestion = *s, "Unknown key in .tabletest.toml, did you mean '{s}'?");
        }
        _ => warn!(key, "Unknown key in .tabletest.toml (known keys: {})", KNOWN_CONFIG_KEYS.join(", ")),
    }
}

fn config_bool(table: &toml::Table, key: &str, path: &Path) -> Result<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| Error::Config {
            path: path.to_path_buf(),
            message: format!("'{key}' must be a boolean"),
        }),
    }
}

fn config_strings(table: &toml::Table, key: &str, path: &Path) -> Result<Option<Vec<String>>> {
    let Some(value) = table.get(key) else {
        return Ok(None);
    };
    let invalid = || Error::Config {
        path: path.to_path_buf(),
        message: format!("'{key}' must be an array of strings"),
    };
    let items = value.as_array().ok_or_else(invalid)?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Load run configuration from `.tabletest.toml` in `root`.
///
/// Missing file means defaults. Unknown keys only warn (with a typo suggestion); a file
/// that does not parse or a key with the wrong type is an [`Error::Config`].
pub fn load_config(root: &Path) -> Result<GenerateConfig> {
    let mut config = GenerateConfig::new(root.to_path_buf());
    let config_path = root.join(".tabletest.toml");
    if !config_path.is_file() {
        return Ok(config);
    }

    debug!("Loading .tabletest.toml");
    let content = std::fs::read_to_string(&config_path).map_err(|e| Error::fs(&config_path, e))?;
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| Error::Config { path: config_path.clone(), message: e.to_string() })?;

    for key in table.keys() {
        if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            warn_unknown_key(key);
        }
    }

    // skip_dirs merge with defaults
    if let Some(dirs) = config_strings(&table, "skip_dirs", &config_path)? {
        config.skip_dirs.extend(dirs);
    }
    if let Some(v) = config_bool(&table, "overwrite", &config_path)? {
        config.overwrite = v;
    }
    if let Some(v) = config_bool(&table, "copy_imports", &config_path)? {
        config.copy_imports = v;
    }
    if let Some(v) = config_bool(&table, "format", &config_path)? {
        config.format = v;
    }
    if let Some(cmd) = config_strings(&table, "formatter", &config_path)? {
        config.formatter = cmd;
    }
    if let Some(cmd) = config_strings(&table, "import_organizer", &config_path)? {
        config.import_organizer = cmd;
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Generate run
// ---------------------------------------------------------------------------

/// Whether a free function can be referenced by name from a test.
///
/// `init` may not be referred to and may be declared several times per file; `_` has
/// no name to call.
fn is_callable(name: &str) -> bool {
    name != "init" && name != "_"
}

/// Scan, synthesize, merge and post-process one tree.
///
/// Methods, `init` functions and blank-named functions are counted and skipped. `post` runs over every written file when
/// `config.format` is set; a failure there aborts the run after the files are on disk.
pub fn run_generate(config: &GenerateConfig, post: &dyn PostProcessor) -> Result<RunReport> {
    info!(root = %config.root.display(), overwrite = config.overwrite, "Generating test scaffolds");
    let start = Instant::now();

    let scan = scan::scan_declarations(config)?;
    let mut merger =
        Merger::new(MergePolicy { overwrite: config.overwrite, copy_imports: config.copy_imports });

    let mut functions = 0;
    let mut methods_skipped = 0;
    let mut uncallable_skipped = 0;
    for decl in &scan.declarations {
        match decl {
            Declaration::Function(func) if !is_callable(&func.name) => {
                uncallable_skipped += 1;
                debug!(
                    function = func.name.as_str(),
                    path = %func.file_path.display(),
                    "Function cannot be called from a test, skipping"
                );
            }
            Declaration::Function(func) => {
                functions += 1;
                let imports: Vec<&ImportBlock> = scan.imports_for(&func.file_path).collect();
                merger.add(func, &imports, stubs::synthesize(func));
            }
            Declaration::Method { receiver, callable } => {
                methods_skipped += 1;
                debug!(
                    method = callable.name.as_str(),
                    receiver = receiver.as_str(),
                    "Method scaffolds are not generated, skipping"
                );
            }
            Declaration::Struct(_) | Declaration::Import(_) => {}
        }
    }

    let outcome = merger.flush()?;

    if config.format {
        for path in &outcome.written {
            post.process(path)?;
        }
    }

    let time_ms = start.elapsed().as_millis() as u64;
    info!(
        files = scan.files.len(),
        functions,
        methods_skipped,
        uncallable_skipped,
        written = outcome.written.len(),
        skipped = outcome.skipped.len(),
        time_ms,
        "Generation complete"
    );

    Ok(RunReport {
        root: config.root.display().to_string(),
        files_scanned: scan.files.len(),
        functions,
        methods_skipped,
        uncallable_skipped,
        structs: scan.structs().count(),
        imports: scan.count_imports(),
        written: outcome.written.iter().map(|p| p.display().to_string()).collect(),
        skipped: outcome.skipped.iter().map(|p| p.display().to_string()).collect(),
        time_ms,
    })
}
