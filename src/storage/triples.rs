//! Subject/predicate/object projection of the extracted model.
//!
//! The triples are what a graph store needs to answer "which classes does
//! this file define" or "what does this class compose"; persisting them is
//! left to the consumer.

use serde::{Deserialize, Serialize};

use crate::types::{ClassGraph, FileSymbols, RelationshipKind, Result};

pub mod predicates {
    pub const IS: &str = "is";
    pub const HAS_DETAIL: &str = "has_detail";
    pub const HAS_PAGE_INFO: &str = "has_page_info";
    pub const HAS_CLASS: &str = "has_class";
    pub const HAS_FUNCTION: &str = "has_function";
    pub const IS_GENERALIZATION_OF: &str = "is_generalization_of";
    pub const IS_COMPOSITE_OF: &str = "is_composite_of";
    pub const IS_AGGREGATE_OF: &str = "is_aggregate_of";
}

/// Object of an `is` triple naming a class node
pub const CLASS_OBJECT: &str = "class";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

fn relationship_predicate(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Generalization => predicates::IS_GENERALIZATION_OF,
        RelationshipKind::Composition => predicates::IS_COMPOSITE_OF,
        RelationshipKind::Aggregation => predicates::IS_AGGREGATE_OF,
    }
}

/// Join namespace parts with `:`, skipping empty ones.
pub fn concat_namespace<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

/// Class nodes and typed edges of a reconciled graph.
pub fn class_graph_triples(graph: &ClassGraph) -> Result<Vec<Triple>> {
    let mut triples = Vec::with_capacity(graph.classes.len() * 2 + graph.relationships.len());

    for class in &graph.classes {
        triples.push(Triple::new(&class.package, predicates::IS, CLASS_OBJECT));
        triples.push(Triple::new(
            &class.package,
            predicates::HAS_DETAIL,
            serde_json::to_string(class)?,
        ));
    }

    for edge in graph.typed_relationships() {
        let Some(kind) = edge.kind else {
            continue;
        };
        triples.push(Triple::new(
            &edge.source,
            relationship_predicate(kind),
            &edge.destination,
        ));
    }

    Ok(triples)
}

/// File membership and page blocks of one symbol table.
pub fn symbol_triples(symbols: &FileSymbols) -> Result<Vec<Triple>> {
    let file = symbols.file.as_str();
    let mut triples = Vec::new();

    for class in &symbols.classes {
        triples.push(Triple::new(
            file,
            predicates::HAS_CLASS,
            concat_namespace(&[file, class.name.as_str()]),
        ));
    }
    for function in &symbols.functions {
        triples.push(Triple::new(
            file,
            predicates::HAS_FUNCTION,
            concat_namespace(&[file, function.as_str()]),
        ));
    }
    for block in &symbols.page_blocks {
        let mut parts = vec![file];
        parts.extend(block.tokens.iter().map(String::as_str));
        triples.push(Triple::new(
            concat_namespace(&parts),
            predicates::HAS_PAGE_INFO,
            serde_json::to_string(block)?,
        ));
    }

    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockKind, ClassNode, ClassSymbols, CodeBlock, RelationshipEdge};

    #[test]
    fn test_class_graph_triples() {
        let mut graph = ClassGraph::new(
            vec![ClassNode::new("Order", "shop/model.py:Order")],
            vec![
                RelationshipEdge {
                    source: "shop/model.py:Line".into(),
                    destination: "shop/model.py:Order".into(),
                    kind: Some(RelationshipKind::Composition),
                    label: Some("lines".into()),
                },
                RelationshipEdge {
                    source: "a".into(),
                    destination: "b".into(),
                    kind: None,
                    label: None,
                },
            ],
        );
        graph.root_path = "/src".into();

        let triples = class_graph_triples(&graph).unwrap();
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0], Triple::new("shop/model.py:Order", "is", "class"));
        assert_eq!(triples[1].predicate, "has_detail");
        let detail: ClassNode = serde_json::from_str(&triples[1].object).unwrap();
        assert_eq!(detail.name, "Order");
        assert_eq!(
            triples[2],
            Triple::new("shop/model.py:Line", "is_composite_of", "shop/model.py:Order")
        );
    }

    #[test]
    fn test_symbol_triples() {
        let symbols = FileSymbols {
            file: "main.py".into(),
            classes: vec![ClassSymbols {
                name: "App".into(),
                methods: vec![],
            }],
            functions: vec!["main".into()],
            globals: vec![],
            page_blocks: vec![
                CodeBlock::new(BlockKind::Conditional, 9, 10)
                    .with_tokens(vec!["__name__".into(), "__main__".into()]),
                CodeBlock::new(BlockKind::ImportFrom, 1, 1)
                    .with_property("module", serde_json::Value::Null),
            ],
        };

        let triples = symbol_triples(&symbols).unwrap();
        assert_eq!(triples[0], Triple::new("main.py", "has_class", "main.py:App"));
        assert_eq!(triples[1], Triple::new("main.py", "has_function", "main.py:main"));
        assert_eq!(triples[2].subject, "main.py:__name__:__main__");
        assert_eq!(triples[3].subject, "main.py");
        assert_eq!(triples[3].predicate, "has_page_info");
    }

    #[test]
    fn test_concat_namespace_skips_empty() {
        assert_eq!(concat_namespace(&["a.py", "", "X"]), "a.py:X");
    }
}
