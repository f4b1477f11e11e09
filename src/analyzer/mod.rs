//! Code Analyzer Module
//!
//! - Symbol extraction (tree-sitter)
//! - File scanning with gitignore support
//! - Repository façade combining symbols and class views

pub mod parser;
pub mod repository;
pub mod scanner;

pub use repository::{RepositoryModel, extract_file};
