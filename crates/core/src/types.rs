use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for one generate run. Loaded from `.tabletest.toml` or defaults,
/// with CLI flags applied on top.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub root: PathBuf,
    /// Directory names to skip during walk.
    pub skip_dirs: HashSet<String>,
    /// Replace existing `_test.go` files instead of leaving them alone.
    pub overwrite: bool,
    /// Seed new test files with the import blocks of their source file.
    pub copy_imports: bool,
    /// Run the formatter and import organizer over written files.
    pub format: bool,
    /// Formatter command prefix; the file path is appended.
    pub formatter: Vec<String>,
    /// Import organizer command prefix; the file path is appended.
    pub import_organizer: Vec<String>,
}

impl GenerateConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            skip_dirs: [".git", "vendor", "node_modules", "testdata"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            overwrite: false,
            copy_imports: false,
            format: true,
            formatter: vec!["go".to_string(), "fmt".to_string()],
            import_organizer: vec!["goimports".to_string(), "-w".to_string()],
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// Shared shape of a function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callable {
    pub file_path: PathBuf,
    pub package: String,
    pub name: String,
    /// Verbatim declaration text, body included.
    pub raw_text: String,
    /// Parameter list exactly as written, parentheses included.
    pub parameters: String,
    /// Result list exactly as written; empty when there are no results.
    pub results: String,
}

/// A named field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    pub file_path: PathBuf,
    pub name: String,
    pub raw_text: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBlock {
    pub file_path: PathBuf,
    pub raw_text: String,
}

/// One top-level unit discovered in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Function(Callable),
    Method { receiver: String, callable: Callable },
    Struct(StructType),
    Import(ImportBlock),
}

impl Declaration {
    pub fn file_path(&self) -> &Path {
        match self {
            Declaration::Function(c) | Declaration::Method { callable: c, .. } => &c.file_path,
            Declaration::Struct(s) => &s.file_path,
            Declaration::Import(i) => &i.file_path,
        }
    }
}

/// Everything a scan pass found, in walk order. Declarations of one file are contiguous
/// and keep source order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    pub declarations: Vec<Declaration>,
}

impl ScanResult {
    pub fn functions(&self) -> impl Iterator<Item = &Callable> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(c) => Some(c),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructType> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Struct(s) => Some(s),
            _ => None,
        })
    }

    /// Import blocks of a single source file, in source order.
    pub fn imports_for<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a ImportBlock> + 'a {
        self.declarations.iter().filter_map(move |d| match d {
            Declaration::Import(i) if i.file_path == file => Some(i),
            _ => None,
        })
    }

    pub fn count_imports(&self) -> usize {
        self.declarations.iter().filter(|d| matches!(d, Declaration::Import(_))).count()
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// One parameter or result position of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub name: Option<String>,
    pub type_text: String,
}

impl Slot {
    pub fn is_variadic(&self) -> bool {
        self.type_text.starts_with("...")
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of a generate run, printed by the CLI as text or JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub root: String,
    pub files_scanned: usize,
    pub functions: usize,
    pub methods_skipped: usize,
    /// `init` and blank-named functions, which cannot be called from a test.
    pub uncallable_skipped: usize,
    pub structs: usize,
    pub imports: usize,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub time_ms: u64,
}
