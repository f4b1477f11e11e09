pub mod class_view;
pub mod error;
pub mod symbols;
pub mod utils;

pub use class_view::{
    ClassGraph, ClassNode, MethodDescriptor, RelationshipEdge, RelationshipKind, TypeDescriptor,
    split_canonical,
};
pub use error::{Result, ScopeError};
pub use symbols::{BlockKind, ClassSymbols, CodeBlock, FileSymbols};
pub use utils::{log_filter_error, log_filter_warn, sorted_unique, to_slash};
