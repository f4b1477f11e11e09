//! Class-diagram ingestion: descriptor parsers, the `dot` reader, namespace
//! reconciliation and the external generator that produces the text.

pub mod dot;
pub mod generator;
pub mod method;
pub mod namespace;
pub mod signature;

pub use dot::{ingest, parse_class_views, parse_relationships};
pub use generator::{DiagramArtifacts, DiagramGenerator, PyreverseGenerator};
pub use namespace::{reconcile, root_offset};
