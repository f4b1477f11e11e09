//! reposcope - source-structure extraction for Python codebases
//!
//! Two independent products are built from one repository root:
//!
//! - **Symbol tables**: per-file classes, functions, module-level bindings
//!   and code blocks, extracted with tree-sitter.
//! - **Class views**: the output of an external class-diagram generator,
//!   parsed and rewritten so every identifier reads `<relative file>:<Class>`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use reposcope::{Config, RepositoryModel};
//! use reposcope::diagram::PyreverseGenerator;
//!
//! let config = Config::default();
//! let generator = PyreverseGenerator::new(&config.diagram);
//! let model = RepositoryModel::new("path/to/repo", config);
//!
//! let symbols = model.generate_symbols()?;
//! let graph = model.rebuild_class_views(&generator).await?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: file scanning, tree-sitter symbol extraction, repository façade
//! - [`diagram`]: DOT ingestion, descriptor parsing, namespace reconciliation
//! - [`storage`]: structure dumps and graph-store triples
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod storage;
pub mod types;

pub use analyzer::RepositoryModel;
pub use config::{Config, ConfigLoader, OutputFormat};
pub use types::error::{Result, ScopeError};

pub use analyzer::{
    parser::{Language, PythonParser, SymbolParser},
    scanner::FileScanner,
};
pub use diagram::{DiagramGenerator, PyreverseGenerator};
