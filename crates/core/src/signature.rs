//! Parameter and result list decomposition.
//!
//! Works on the raw text captured by the scanner, not on the syntax tree, so the
//! same code handles `(a, b int)`, `(int, error)`, `error` and `(xs ...string)`.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Slot;

/// Keywords that start a type literal; `chan int` is a type, not a name followed by a type.
const TYPE_KEYWORDS: &[&str] = &["chan", "func", "map", "struct", "interface"];

/// A piece that starts with an identifier followed by whitespace and a type.
static NAMED_PIECE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([\p{L}_][\p{L}\p{N}_]*)\s+(\S.*)$").unwrap());

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Remove one enclosing pair of parentheses when the first `(` closes at the last byte.
fn strip_parens(text: &str) -> &str {
    let text = text.trim();
    if !(text.starts_with('(') && text.ends_with(')')) {
        return text;
    }
    let mut depth = 0i32;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return if i == text.len() - 1 { &text[1..i] } else { text };
                }
            }
            _ => {}
        }
    }
    text
}

/// Split on commas that are not nested in `()`, `[]` or `{}`. Pieces are trimmed and
/// empty pieces (e.g. from a trailing comma) are dropped.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(text[start..].trim());
    pieces.retain(|p| !p.is_empty());
    pieces
}

enum Piece<'a> {
    Named { name: &'a str, type_text: &'a str },
    Bare(&'a str),
}

fn classify(piece: &str) -> Piece<'_> {
    if let Some(caps) = NAMED_PIECE.captures(piece) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let type_text = caps.get(2).map_or("", |m| m.as_str().trim());
        if !TYPE_KEYWORDS.contains(&name) {
            return Piece::Named { name, type_text };
        }
    }
    Piece::Bare(piece)
}

/// Decompose a raw parameter or result list into ordered slots.
///
/// In a list where any piece carries a name, bare identifiers are names that share the
/// type of the next named piece, so `(a, b int)` gives two `int` slots. Otherwise every
/// piece is a nameless type.
pub fn decompose(list: &str) -> Vec<Slot> {
    let pieces: Vec<Piece> = split_top_level(strip_parens(list)).into_iter().map(classify).collect();
    let named_list = pieces.iter().any(|p| matches!(p, Piece::Named { .. }));

    let mut slots: Vec<Slot> = Vec::with_capacity(pieces.len());
    let mut pending: Vec<&str> = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Named { name, type_text } => {
                for grouped in pending.drain(..) {
                    push_slot(&mut slots, Some(grouped), type_text);
                }
                push_slot(&mut slots, Some(name), type_text);
            }
            Piece::Bare(text) if named_list && is_identifier(text) => pending.push(text),
            Piece::Bare(text) => push_slot(&mut slots, None, text),
        }
    }
    // Names with no type after them: malformed, keep them as bare types.
    for text in pending {
        push_slot(&mut slots, None, text);
    }
    slots
}

fn push_slot(slots: &mut Vec<Slot>, name: Option<&str>, type_text: &str) {
    slots.push(Slot { index: slots.len(), name: name.map(str::to_string), type_text: type_text.to_string() });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
