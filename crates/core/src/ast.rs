//! tree-sitter parsing of Go source into declaration records.
//!
//! Only top-level declarations are collected: functions, methods, struct types and
//! import blocks. Every captured text is an exact byte slice of the original file,
//! so parameter and result lists keep their parentheses, spacing and comments.

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::error::{Error, Result};
use crate::types::{Callable, Declaration, Field, ImportBlock, StructType};

// ---------------------------------------------------------------------------
// Span helpers
// ---------------------------------------------------------------------------

/// Slice the source text covered by `node`.
///
/// Fails with [`Error::PositionRange`] when the node's byte range does not lie inside
/// `source` on character boundaries.
fn node_text<'a>(node: &Node, source: &'a str, path: &Path) -> Result<&'a str> {
    let (start, end) = (node.start_byte(), node.end_byte());
    source.get(start..end).ok_or_else(|| Error::PositionRange {
        path: path.to_path_buf(),
        start,
        end,
        len: source.len(),
    })
}

/// Text of a named field child, or an empty string when the field is absent.
fn field_text<'a>(node: &Node, field: &str, source: &'a str, path: &Path) -> Result<&'a str> {
    match node.child_by_field_name(field) {
        Some(child) => node_text(&child, source, path),
        None => Ok(""),
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Declaration extraction
// ---------------------------------------------------------------------------

fn package_name<'a>(root: &Node, source: &'a str, path: &Path) -> Result<&'a str> {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_clause" {
            if let Some(ident) = child.named_child(0) {
                return node_text(&ident, source, path);
            }
        }
    }
    Ok("")
}

fn extract_callable(node: &Node, source: &str, path: &Path, package: &str) -> Result<Callable> {
    Ok(Callable {
        file_path: path.to_path_buf(),
        package: package.to_string(),
        name: field_text(node, "name", source, path)?.to_string(),
        raw_text: node_text(node, source, path)?.to_string(),
        parameters: field_text(node, "parameters", source, path)?.to_string(),
        results: field_text(node, "result", source, path)?.to_string(),
    })
}

/// Fields of a `struct_type`, one entry per declared name.
///
/// `a, b int` yields two fields; an embedded field is named after its unqualified type.
fn extract_fields(struct_node: &Node, source: &str, path: &Path) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut cursor = struct_node.walk();
    let Some(list) = struct_node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "field_declaration_list")
    else {
        return Ok(fields);
    };

    let mut list_cursor = list.walk();
    for decl in list.named_children(&mut list_cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut data_type = node_text(&type_node, source, path)?.to_string();

        let mut name_cursor = decl.walk();
        let names: Vec<Node> = decl.children_by_field_name("name", &mut name_cursor).collect();
        if names.is_empty() {
            // Embedded field, possibly behind a pointer.
            if decl.child(0).is_some_and(|c| c.kind() == "*") {
                data_type = format!("*{data_type}");
            }
            let name = data_type.rsplit('.').next().unwrap_or(&data_type).trim_start_matches('*');
            fields.push(Field { name: name.to_string(), data_type: data_type.clone() });
            continue;
        }
        for name_node in names {
            fields.push(Field {
                name: node_text(&name_node, source, path)?.to_string(),
                data_type: data_type.clone(),
            });
        }
    }
    Ok(fields)
}

fn extract_structs(
    type_decl: &Node,
    source: &str,
    path: &Path,
    out: &mut Vec<Declaration>,
) -> Result<()> {
    let mut cursor = type_decl.walk();
    for type_spec in type_decl.named_children(&mut cursor) {
        if type_spec.kind() != "type_spec" {
            continue;
        }
        let Some(type_node) = type_spec.child_by_field_name("type") else {
            continue;
        };
        if type_node.kind() != "struct_type" {
            continue;
        }
        out.push(Declaration::Struct(StructType {
            file_path: path.to_path_buf(),
            name: field_text(&type_spec, "name", source, path)?.to_string(),
            raw_text: node_text(&type_node, source, path)?.to_string(),
            fields: extract_fields(&type_node, source, path)?,
        }));
    }
    Ok(())
}

/// Parse one Go file and return its top-level declarations in source order.
///
/// A tree that contains any syntax error aborts with [`Error::StructuralParse`] pointing
/// at the first offending node (1-based line and column).
pub fn parse_go_file(path: &Path, source: &str) -> Result<Vec<Declaration>> {
    let parse_error = |line: usize, column: usize| Error::StructuralParse {
        path: path.to_path_buf(),
        line,
        column,
    };

    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into()).map_err(|_| parse_error(0, 0))?;
    let tree = parser.parse(source, None).ok_or_else(|| parse_error(1, 1))?;
    let root = tree.root_node();

    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(parse_error(at.row + 1, at.column + 1));
    }

    let package = package_name(&root, source, path)?;
    let mut decls = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "function_declaration" => {
                decls.push(Declaration::Function(extract_callable(&child, source, path, package)?));
            }
            "method_declaration" => {
                decls.push(Declaration::Method {
                    receiver: field_text(&child, "receiver", source, path)?.to_string(),
                    callable: extract_callable(&child, source, path, package)?,
                });
            }
            "type_declaration" => extract_structs(&child, source, path, &mut decls)?,
            "import_declaration" => decls.push(Declaration::Import(ImportBlock {
                file_path: path.to_path_buf(),
                raw_text: node_text(&child, source, path)?.to_string(),
            })),
            _ => {}
        }
    }

    debug!(path = %path.display(), package, declarations = decls.len(), "Parsed Go file");
    Ok(decls)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const GREETER_SRC: &str = r#"package tested

import "github.com/example/app/interfaces"

type tested struct {
	greeter interfaces.Sample
}

type Tested interface {
	Greetings() string
}

func NewTested(greeter interfaces.Sample) Tested {
	return &tested{
		greeter: greeter,
	}
}

func (t *tested) Greetings() string {
	return t.greeter.Greet()
}

func Shout(name string) string {
	return name + "!"
}
"#;

    fn parse(src: &str) -> Vec<Declaration> {
        parse_go_file(Path::new("tested/tested.go"), src).expect("Should parse Go")
    }

    fn function<'a>(decls: &'a [Declaration], name: &str) -> &'a Callable {
        decls
            .iter()
            .find_map(|d| match d {
                Declaration::Function(c) if c.name == name => Some(c),
                _ => None,
            })
            .unwrap_or_else(|| panic!("Should find function '{name}'"))
    }

    #[test]
    fn test_parse_declarations_in_source_order() {
        let decls = parse(GREETER_SRC);
        let kinds: Vec<&str> = decls
            .iter()
            .map(|d| match d {
                Declaration::Function(_) => "fn",
                Declaration::Method { .. } => "method",
                Declaration::Struct(_) => "struct",
                Declaration::Import(_) => "import",
            })
            .collect();
        // The interface type is not a struct and is not collected.
        assert_eq!(kinds, vec!["import", "struct", "fn", "method", "fn"]);
    }

    #[test]
    fn test_function_spans_are_verbatim() {
        let decls = parse(GREETER_SRC);
        let f = function(&decls, "NewTested");
        assert_eq!(f.package, "tested");
        assert_eq!(f.parameters, "(greeter interfaces.Sample)");
        assert_eq!(f.results, "Tested");
        assert!(f.raw_text.starts_with("func NewTested("), "Raw text: {}", f.raw_text);
        assert!(f.raw_text.ends_with('}'), "Raw text should include the body: {}", f.raw_text);
    }

    #[test]
    fn test_method_keeps_receiver() {
        let decls = parse(GREETER_SRC);
        let (receiver, callable) = decls
            .iter()
            .find_map(|d| match d {
                Declaration::Method { receiver, callable } => Some((receiver, callable)),
                _ => None,
            })
            .expect("Should find the method");
        assert_eq!(receiver, "(t *tested)");
        assert_eq!(callable.name, "Greetings");
        assert_eq!(callable.parameters, "()");
        assert_eq!(callable.results, "string");
    }

    #[test]
    fn test_struct_fields() {
        let src = r#"package shapes

import "io"

type Box struct {
	W, H  int
	Label string `json:"label"`
	io.Reader
	*Lid
}
"#;
        let decls = parse_go_file(Path::new("shapes.go"), src).unwrap();
        let st = decls
            .iter()
            .find_map(|d| match d {
                Declaration::Struct(s) => Some(s),
                _ => None,
            })
            .expect("Should find struct");
        assert_eq!(st.name, "Box");
        assert!(st.raw_text.starts_with("struct {"), "Raw text: {}", st.raw_text);
        assert!(st.raw_text.ends_with('}'), "Raw text: {}", st.raw_text);
        let pairs: Vec<(&str, &str)> =
            st.fields.iter().map(|f| (f.name.as_str(), f.data_type.as_str())).collect();
        assert_eq!(
            pairs,
            vec![("W", "int"), ("H", "int"), ("Label", "string"), ("Reader", "io.Reader"), ("Lid", "*Lid")]
        );
    }

    #[test]
    fn test_multiple_results_and_no_results() {
        let src = "package math\n\nfunc Add(a, b int) (int, error) {\n\treturn a + b, nil\n}\n\nfunc Noop() {}\n";
        let decls = parse_go_file(Path::new("math.go"), src).unwrap();
        let add = function(&decls, "Add");
        assert_eq!(add.parameters, "(a, b int)");
        assert_eq!(add.results, "(int, error)");
        let noop = function(&decls, "Noop");
        assert_eq!(noop.parameters, "()");
        assert_eq!(noop.results, "");
    }

    #[test]
    fn test_generic_function_keeps_raw_lists() {
        let src = "package fp\n\nfunc Map[T, U any](xs []T, f func(T) U) []U {\n\treturn nil\n}\n";
        let decls = parse_go_file(Path::new("fp.go"), src).unwrap();
        let m = function(&decls, "Map");
        assert_eq!(m.parameters, "(xs []T, f func(T) U)");
        assert_eq!(m.results, "[]U");
    }

    #[test]
    fn test_grouped_import_block_is_one_declaration() {
        let src = "package web\n\nimport (\n\t\"fmt\"\n\t\"net/http\"\n)\n\nfunc Hello() string { return fmt.Sprint(http.StatusOK) }\n";
        let decls = parse_go_file(Path::new("web.go"), src).unwrap();
        let imports: Vec<&ImportBlock> = decls
            .iter()
            .filter_map(|d| match d {
                Declaration::Import(i) => Some(i),
                _ => None,
            })
            .collect();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].raw_text, "import (\n\t\"fmt\"\n\t\"net/http\"\n)");
    }

    #[test]
    fn test_syntax_error_is_structural() {
        let src = "package broken\n\nfunc Oops(a int {\n}\n";
        let err = parse_go_file(Path::new("broken.go"), src).unwrap_err();
        match err {
            Error::StructuralParse { path, line, .. } => {
                assert_eq!(path, Path::new("broken.go"));
                assert!(line >= 1, "Line should be 1-based, got {line}");
            }
            other => panic!("Expected StructuralParse, got {other:?}"),
        }
    }

    #[test]
    fn test_span_outside_source_is_position_error() {
        let src = "package p\n\nfunc A() {}\n";
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).unwrap();
        let tree = parser.parse(src, None).unwrap();
        let root = tree.root_node();
        // Slice against a shorter buffer than the one the tree was built from.
        let err = node_text(&root, "package", Path::new("p.go")).unwrap_err();
        assert!(matches!(err, Error::PositionRange { len: 7, .. }), "Got {err:?}");
    }
}
