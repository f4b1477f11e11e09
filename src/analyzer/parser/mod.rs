//! Language Parser Module
//!
//! Tree-sitter based symbol extractors.
//!
//! ## Parser Factory
//!
//! ```rust,ignore
//! use reposcope::analyzer::parser::{Language, create_parser};
//!
//! let parser = create_parser(Language::Python)?;
//! let symbols = parser.parse("app.py", content)?;
//! ```

pub mod language;
pub mod python;
pub mod traits;

pub use language::Language;
pub use python::{PythonParser, ValueExpr};
pub use traits::{SymbolParser, create_ts_parser, get_node_lines, get_node_text, named_children};

use crate::types::{Result, ScopeError};

/// Create a parser for the given language.
///
/// Returns an error if the language has no symbol extractor.
pub fn create_parser(language: Language) -> Result<Box<dyn SymbolParser>> {
    match language {
        Language::Python => Ok(Box::new(PythonParser::new()?)),
        _ => Err(ScopeError::Config(format!(
            "No parser support for language: {}",
            language
        ))),
    }
}

/// Try to create a parser for a file path.
///
/// Returns None if the language is not detected or not supported.
pub fn create_parser_for_path(path: &str) -> Option<Box<dyn SymbolParser>> {
    let language = Language::from_path(path);
    if language.has_parser_support() {
        create_parser(language).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parser_python() {
        let parser = create_parser(Language::Python);
        assert!(parser.is_ok());
        assert_eq!(parser.unwrap().language(), Language::Python);
    }

    #[test]
    fn test_create_parser_unsupported() {
        assert!(create_parser(Language::JavaScript).is_err());
    }

    #[test]
    fn test_create_parser_for_path() {
        assert!(create_parser_for_path("pkg/mod.py").is_some());
        assert!(create_parser_for_path("web/app.js").is_none());
        assert!(create_parser_for_path("unknown.xyz").is_none());
    }
}
