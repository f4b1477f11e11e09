pub mod structure;
pub mod triples;

pub use structure::{default_output_path, to_csv, to_json, write_structure};
pub use triples::{Triple, class_graph_triples, concat_namespace, symbol_triples};
