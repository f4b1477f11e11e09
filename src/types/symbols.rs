//! Per-file symbol records produced by the symbol extractor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Module-level "am I the program entry" identifier and its sentinel value.
pub const MAIN_GUARD_NAME: &str = "__name__";
pub const MAIN_GUARD_VALUE: &str = "__main__";

/// Symbol table for one analyzed file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileSymbols {
    /// Path relative to the analysis root, `/` separated
    pub file: String,
    pub classes: Vec<ClassSymbols>,
    pub functions: Vec<String>,
    pub globals: Vec<String>,
    /// Top-level statements in source order
    pub page_blocks: Vec<CodeBlock>,
}

impl FileSymbols {
    /// Record for a file that could not be parsed
    pub fn empty(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.functions.is_empty()
            && self.globals.is_empty()
            && self.page_blocks.is_empty()
    }

    /// Conditional blocks guarding "run as a program" code.
    pub fn main_entry_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.page_blocks.iter().filter(|b| b.is_main_guard())
    }

    /// Re-key the record under `prefix`, a `/` separated directory path.
    pub fn rebased(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            self.file = format!("{}/{}", prefix, self.file);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassSymbols {
    pub name: String,
    pub methods: Vec<String>,
}

/// Statement category of a page block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Import,
    ImportFrom,
    ClassDef,
    FunctionDef,
    AsyncFunctionDef,
    Assignment,
    AnnotatedAssignment,
    Conditional,
    Expression,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Import => "import",
            BlockKind::ImportFrom => "import-from",
            BlockKind::ClassDef => "class-def",
            BlockKind::FunctionDef => "function-def",
            BlockKind::AsyncFunctionDef => "async-function-def",
            BlockKind::Assignment => "assignment",
            BlockKind::AnnotatedAssignment => "annotated-assignment",
            BlockKind::Conditional => "conditional",
            BlockKind::Expression => "expression",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural summary of one top-level statement ("page block")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// 1-based, inclusive
    pub start_line: u32,
    /// 1-based, inclusive, never below `start_line`
    pub end_line: u32,
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, serde_json::Value>,
}

impl CodeBlock {
    pub fn new(kind: BlockKind, start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line: end_line.max(start_line),
            kind,
            tokens: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// `if __name__ == "__main__":` style guard
    pub fn is_main_guard(&self) -> bool {
        self.kind == BlockKind::Conditional
            && self.tokens.first().map(String::as_str) == Some(MAIN_GUARD_NAME)
            && self.tokens.iter().any(|t| t == MAIN_GUARD_VALUE)
    }
}
