use crate::types::{FileSymbols, Result, ScopeError};

/// Extracts the top-level symbol table of one source file
pub trait SymbolParser: Send + Sync {
    /// Fails with `ScopeError::Parse` when the file is not valid source.
    fn parse(&self, path: &str, content: &str) -> Result<FileSymbols>;
    fn language(&self) -> super::Language;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based inclusive line span of a tree-sitter node.
pub fn get_node_lines(node: tree_sitter::Node) -> (u32, u32) {
    (
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

/// Named children, comments excluded.
pub fn named_children<'t>(node: tree_sitter::Node<'t>) -> Vec<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| ScopeError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_helpers() {
        let source = "# note\nx = 1\n\ny = 2\n";
        let mut parser = create_ts_parser(tree_sitter_python::LANGUAGE, "Python").unwrap();
        let tree = parser.parse(source, None).unwrap();
        let root = tree.root_node();

        let statements = named_children(root);
        assert_eq!(statements.len(), 2);
        assert_eq!(get_node_text(statements[0], source.as_bytes()), "x = 1");
        assert_eq!(get_node_lines(statements[1]), (4, 4));
    }
}
