//! Type-Signature Parser
//!
//! Parses the `name[: type][= default]` descriptors that the diagram tool
//! renders for attributes and parameters. The grammar is loose tool output,
//! so parsing is total: any string yields a descriptor, in the worst case
//! an empty one.
//!
//! Boundaries follow a fixed tie-break: the name ends at the *first* `:`
//! and the default starts after the *last* `=`. A default that itself holds
//! an unbracketed `:` or a type holding a bare `=` is ambiguous, and is
//! split by that rule rather than by bracket-aware scanning.

use crate::constants::signature::{BUILTIN_TYPE_NAMES, LITERAL_OPEN, NULL_TYPE, NULL_VALUE};
use crate::types::{TypeDescriptor, sorted_unique};

impl TypeDescriptor {
    /// Parse an attribute or parameter descriptor.
    ///
    /// ```rust,ignore
    /// let d = TypeDescriptor::parse("items: List[Foo] = None");
    /// assert_eq!(d.compositions, vec!["Foo"]);
    /// assert_eq!(d.default_value, "");
    /// ```
    pub fn parse(descriptor: &str) -> Self {
        let marked = insert_implicit_markers(descriptor);

        let (Some(colon), Some(equals)) = (marked.find(':'), marked.rfind('=')) else {
            return Self::default();
        };
        if equals <= colon {
            return Self::default();
        }

        let name = marked[..colon].trim().to_string();
        let (type_expr, compositions) = normalize_type_expr(&marked[colon + 1..equals]);
        let mut default_value = marked[equals + 1..].trim().to_string();
        if default_value == NULL_VALUE {
            default_value.clear();
        }

        Self {
            name,
            type_expr,
            default_value,
            compositions,
        }
    }

    /// Build an unnamed descriptor from a bare type expression (method returns).
    pub fn from_type_expr(expr: &str) -> Self {
        let (type_expr, compositions) = normalize_type_expr(expr);
        Self {
            type_expr,
            compositions,
            ..Default::default()
        }
    }
}

/// Make the `:` and `=` positions well defined.
///
/// An `=` met before any `:` gets an empty type inserted in front of it; a
/// missing `:` or `=` is appended at the end.
fn insert_implicit_markers(descriptor: &str) -> String {
    let mut out = String::with_capacity(descriptor.len() + 2);
    let mut seen_colon = false;
    let mut seen_equals = false;

    for c in descriptor.chars() {
        match c {
            ':' => seen_colon = true,
            '=' => {
                seen_equals = true;
                if !seen_colon {
                    out.push(':');
                    seen_colon = true;
                }
            }
            _ => {}
        }
        out.push(c);
    }

    if !seen_colon {
        out.push(':');
    }
    if !seen_equals {
        out.push('=');
    }
    out
}

/// Normalize a type expression and scan it for referenced type names.
///
/// Returns the stored form and its sorted compositions.
fn normalize_type_expr(raw: &str) -> (String, Vec<String>) {
    let compact = remove_whitespace(raw);
    if compact == NULL_TYPE {
        return (String::new(), Vec::new());
    }

    match split_literal(&compact) {
        Some((pre, literal, post)) => {
            let pre = strip_quotes(pre);
            let post = strip_quotes(post);
            // Literal values are not type references
            let scanned = format!("{pre}Literal{post}");
            (format!("{pre}{literal}{post}"), parse_compositions(&scanned))
        }
        None => {
            let stored = strip_quotes(&compact);
            let compositions = parse_compositions(&stored);
            (stored, compositions)
        }
    }
}

/// Drop whitespace outside quoted segments.
fn remove_whitespace(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    let mut quote: Option<char> = None;

    for c in v.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            }
            None if c.is_whitespace() => {}
            None => out.push(c),
        }
    }
    out
}

/// Split around the first `Literal[...]`, matching brackets by depth.
///
/// An unterminated literal runs to the end of the string.
fn split_literal(v: &str) -> Option<(&str, &str, &str)> {
    let begin = v.find(LITERAL_OPEN)?;
    let mut depth = 1usize;
    let mut end = v.len() - 1;

    for (i, b) in v.bytes().enumerate().skip(begin + LITERAL_OPEN.len()) {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    end = i;
                    break;
                }
            }
            _ => {}
        }
    }

    Some((&v[..begin], &v[begin..=end], &v[end + 1..]))
}

fn strip_quotes(v: &str) -> String {
    v.replace(['\'', '"'], "")
}

/// Candidate type names: split on brackets, commas and union bars, minus builtins.
fn parse_compositions(types: &str) -> Vec<String> {
    if types.is_empty() {
        return Vec::new();
    }
    sorted_unique(
        types
            .split(['[', ']', ',', '|'])
            // `\|` survives label splitting; its backslash is not part of a name
            .map(|t| strip_quotes(t.trim().trim_end_matches('\\').trim()))
            .filter(|t| !t.is_empty() && !BUILTIN_TYPE_NAMES.contains(&t.as_str())),
    )
}
