//! Language Detection Module
//!
//! Maps file paths to the languages the scanner selects. Only languages
//! with a symbol extractor are parsed; the rest are still listed in the
//! structure output with empty symbol tables.
//!
//! ```rust,ignore
//! use reposcope::analyzer::parser::Language;
//!
//! assert_eq!(Language::from_path("pkg/app.py"), Language::Python);
//! assert!(!Language::JavaScript.has_parser_support());
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Whether a symbol extractor exists for this language
    has_parser: bool,
}

macro_rules! lang_meta {
    ($display:literal, [$($ext:literal),*], $parser:literal) => {
        LanguageMeta {
            display_name: $display,
            extensions: &[$($ext),*],
            has_parser: $parser,
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Python => lang_meta!("Python", ["py", "pyi", "pyw"], true),
            Language::JavaScript => lang_meta!("JavaScript", ["js", "mjs", "cjs"], false),
            Language::TypeScript => lang_meta!("TypeScript", ["ts", "mts", "cts"], false),
            Language::Unknown => lang_meta!("Unknown", [], false),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    #[default]
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Detect language from file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();
        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.contains(&ext_lower.as_str()))
            .unwrap_or(Language::Unknown)
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Check if this language has a symbol extractor
    pub fn has_parser_support(&self) -> bool {
        self.meta().has_parser
    }

    fn all_variants() -> &'static [Language] {
        &[Language::Python, Language::JavaScript, Language::TypeScript]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("PY"), Language::Python);
        assert_eq!(Language::from_extension("mjs"), Language::JavaScript);
        assert_eq!(Language::from_extension("rs"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("pkg/mod.py"), Language::Python);
        assert_eq!(Language::from_path("web/app.js"), Language::JavaScript);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_parser_support() {
        assert!(Language::Python.has_parser_support());
        assert!(!Language::JavaScript.has_parser_support());
        assert!(!Language::Unknown.has_parser_support());
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::TypeScript.to_string(), "TypeScript");
    }
}
