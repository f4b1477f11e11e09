//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// File scanning constants
pub mod analysis {
    /// Maximum file size to analyze (5MB)
    pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Extensions selected when no configuration overrides them
    pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "js"];

    /// Directories never worth descending into
    pub const DEFAULT_EXCLUDES: &[&str] = &[
        "**/.git/**",
        "**/__pycache__/**",
        "**/node_modules/**",
        "**/.venv/**",
        "**/venv/**",
        "**/.tox/**",
    ];

    /// Default worker threads for per-file extraction
    pub const DEFAULT_WORKERS: usize = 4;
}

/// Type descriptor constants
pub mod signature {
    /// Builtin scalar and generic container names that are never compositions
    pub const BUILTIN_TYPE_NAMES: &[&str] = &[
        "str",
        "frozenset",
        "set",
        "int",
        "float",
        "complex",
        "bool",
        "dict",
        "list",
        "Union",
        "Dict",
        "Set",
        "Tuple",
        "NoneType",
        "None",
        "Any",
        "Optional",
        "Iterator",
        "Literal",
        "List",
    ];

    /// Null-type token normalized away in types and defaults
    pub const NULL_TYPE: &str = "NoneType";
    pub const NULL_VALUE: &str = "None";

    pub const LITERAL_OPEN: &str = "Literal[";
}

/// Diagram tool constants
pub mod diagram {
    /// Default external class-diagram generator
    pub const DEFAULT_COMMAND: &str = "pyreverse";

    /// Default subprocess timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Artifact written by the tool for the class graph
    pub const CLASSES_FILE: &str = "classes.dot";

    /// Artifact written by the tool for the package graph
    pub const PACKAGES_FILE: &str = "packages.dot";
}
