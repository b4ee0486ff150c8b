//! Short identifiers derived from Go type names.

use std::collections::BTreeMap;

/// Go keywords. An abbreviation equal to one cannot be used as an identifier.
const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Name for the `seen`-th use of `base`. Keywords are numbered from their first use.
fn numbered(base: &str, seen: usize) -> String {
    let n = if GO_KEYWORDS.contains(&base) { seen + 1 } else { seen };
    if n == 0 {
        base.to_string()
    } else {
        format!("{base}{n}")
    }
}

/// Compress a type name to its lowercase initials.
///
/// The package qualifier is dropped (`pkg.Reader` → `r`) and leading pointer, slice
/// or variadic markers are skipped (`*HttpClient` → `hc`, `[]byte` → `b`). A type with
/// no letters at all becomes `v`.
pub fn abbreviate(type_text: &str) -> String {
    let unqualified = type_text.rsplit('.').next().unwrap_or(type_text);
    let Some(start) = unqualified.find(|c: char| c.is_alphabetic()) else {
        return "v".to_string();
    };

    let mut chars = unqualified[start..].chars();
    let mut out = String::new();
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }
    for c in chars.filter(|c| c.is_uppercase()) {
        out.extend(c.to_lowercase());
    }
    out
}

/// Per-payload disambiguation table: short identifier → times handed out.
///
/// The first request for an abbreviation returns it unchanged; later requests get a
/// running numeric suffix (`r`, `r1`, `r2`, …). An abbreviation that is a Go keyword is
/// suffixed from the start (`if1`, `if2`). Abbreviations never end in a digit, so
/// suffixed names cannot collide with a plain one.
#[derive(Debug, Default)]
pub struct AbbreviationTable {
    counts: BTreeMap<String, usize>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique field name for a slot of type `type_text`.
    pub fn field_name(&mut self, type_text: &str) -> String {
        let base = abbreviate(type_text);
        let seen = self.counts.entry(base.clone()).or_insert(0);
        let name = numbered(&base, *seen);
        *seen += 1;
        name
    }
}

/// Append the running occurrence count to every repeated element.
///
/// `["a", "b", "a", "a"]` → `["a", "b", "a1", "a2"]`. Keywords follow the same rule as
/// [`AbbreviationTable::field_name`].
pub fn number_duplicates(items: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    items
        .iter()
        .map(|item| {
            let seen = counts.entry(item.as_str()).or_insert(0);
            let out = numbered(item, *seen);
            *seen += 1;
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_examples() {
        assert_eq!(abbreviate("HttpClient"), "hc");
        assert_eq!(abbreviate("string"), "s");
        assert_eq!(abbreviate("pkg.Reader"), "r");
        assert_eq!(abbreviate("interfaces.Sample"), "s");
        assert_eq!(abbreviate("context.Context"), "c");
    }

    #[test]
    fn test_abbreviate_skips_type_markers() {
        assert_eq!(abbreviate("*HttpClient"), "hc");
        assert_eq!(abbreviate("[]byte"), "b");
        assert_eq!(abbreviate("...string"), "s");
        assert_eq!(abbreviate("*http.ResponseWriter"), "rw");
        assert_eq!(abbreviate("map[string]int"), "m");
        assert_eq!(abbreviate("[]*"), "v");
    }

    #[test]
    fn test_abbreviate_is_pure() {
        for t in ["HttpClient", "io.ReadCloser", "int64"] {
            assert_eq!(abbreviate(t), abbreviate(t), "Type: {t}");
        }
    }

    #[test]
    fn test_table_suffixes_collisions() {
        let mut table = AbbreviationTable::new();
        assert_eq!(table.field_name("int"), "i");
        assert_eq!(table.field_name("int"), "i1");
        assert_eq!(table.field_name("io.Reader"), "r");
        assert_eq!(table.field_name("Request"), "r1");
        assert_eq!(table.field_name("*bufio.Reader"), "r2");
        assert_eq!(table.field_name("string"), "s");
    }

    #[test]
    fn test_table_is_injective() {
        let types = ["int", "int64", "Item", "io.Reader", "Reader", "[]Row", "string", "Status"];
        let mut table = AbbreviationTable::new();
        let names: Vec<String> = types.iter().map(|t| table.field_name(t)).collect();
        let unique: std::collections::HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "Duplicate field names: {names:?}");
    }

    #[test]
    fn test_number_duplicates() {
        let args: Vec<String> = ["s", "i", "s", "s"].iter().map(|s| s.to_string()).collect();
        assert_eq!(number_duplicates(&args), vec!["s", "i", "s1", "s2"]);
    }

    #[test]
    fn test_number_duplicates_matches_field_table() {
        let types = ["int", "string", "int", "pkg.Item", "int"];
        let mut table = AbbreviationTable::new();
        let fields: Vec<String> = types.iter().map(|t| table.field_name(t)).collect();
        let raw: Vec<String> = types.iter().map(|t| abbreviate(t)).collect();
        assert_eq!(number_duplicates(&raw), fields);
    }

    #[test]
    fn test_keyword_abbreviations_are_suffixed() {
        assert_eq!(abbreviate("IFace"), "if");
        assert_eq!(abbreviate("GoOptions"), "go");

        let mut table = AbbreviationTable::new();
        assert_eq!(table.field_name("IFace"), "if1");
        assert_eq!(table.field_name("IFoo"), "if2");
        assert_eq!(table.field_name("GObject"), "go1");
        assert_eq!(table.field_name("int"), "i");

        let raw: Vec<String> = ["if", "if", "go", "i"].iter().map(|s| s.to_string()).collect();
        assert_eq!(number_duplicates(&raw), vec!["if1", "if2", "go1", "i"]);
    }
}
