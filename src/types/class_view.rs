//! Class and relationship model ingested from diagram-tool output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed `name: type = default` descriptor of an attribute, parameter or return
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Empty for return descriptors
    pub name: String,
    pub type_expr: String,
    /// Empty string means "no default"
    pub default_value: String,
    /// Referenced non-builtin type names, sorted
    pub compositions: Vec<String>,
}

impl TypeDescriptor {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.type_expr.is_empty() && self.default_value.is_empty()
    }
}

/// Parsed `name(params): return` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<TypeDescriptor>,
    pub return_descriptor: TypeDescriptor,
    /// Union of parameter and return compositions, sorted
    pub aggregations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassNode {
    pub name: String,
    /// Raw dotted namespace until reconciled, canonical identifier afterwards
    pub package: String,
    pub attributes: IndexMap<String, TypeDescriptor>,
    pub methods: IndexMap<String, MethodDescriptor>,
    pub compositions: Vec<String>,
    pub aggregations: Vec<String>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    /// Record an attribute; its compositions are appended in first-seen order.
    pub fn add_attribute(&mut self, attribute: TypeDescriptor) {
        for c in &attribute.compositions {
            if !self.compositions.contains(c) {
                self.compositions.push(c.clone());
            }
        }
        self.attributes.insert(attribute.name.clone(), attribute);
    }

    /// Record a method; only types not already compositions become aggregations.
    pub fn add_method(&mut self, method: MethodDescriptor) {
        for a in &method.aggregations {
            if !self.compositions.contains(a) && !self.aggregations.contains(a) {
                self.aggregations.push(a.clone());
            }
        }
        self.methods.insert(method.name.clone(), method);
    }

    /// Sort both sets and drop aggregations that are also compositions.
    ///
    /// A type reachable through a field wins over one reachable only through
    /// a method signature, whatever order the members were added in.
    pub fn finalize(&mut self) {
        self.compositions.sort();
        self.compositions.dedup();
        let compositions = &self.compositions;
        self.aggregations.retain(|a| !compositions.contains(a));
        self.aggregations.sort();
        self.aggregations.dedup();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Generalization,
    Composition,
    Aggregation,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Generalization => "generalization",
            RelationshipKind::Composition => "composition",
            RelationshipKind::Aggregation => "aggregation",
        }
    }

    /// Whether edges of this kind may carry a label
    pub fn is_labelled(&self) -> bool {
        !matches!(self, RelationshipKind::Generalization)
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub source: String,
    pub destination: String,
    /// `None` when the arrowhead is not one of the known shapes
    pub kind: Option<RelationshipKind>,
    pub label: Option<String>,
}

/// Ingested class graph, raw or reconciled
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassGraph {
    pub classes: Vec<ClassNode>,
    pub relationships: Vec<RelationshipEdge>,
    /// Filesystem prefix stripped during reconciliation, `/` separated
    pub root_path: String,
}

impl ClassGraph {
    pub fn new(classes: Vec<ClassNode>, relationships: Vec<RelationshipEdge>) -> Self {
        Self {
            classes,
            relationships,
            root_path: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relationships.is_empty()
    }

    /// Edges with a recognized relationship kind
    pub fn typed_relationships(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.relationships.iter().filter(|r| r.kind.is_some())
    }

    /// Classes whose canonical identifier lives in `file`
    pub fn classes_in_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a ClassNode> {
        self.classes
            .iter()
            .filter(move |c| split_canonical(&c.package).is_some_and(|(path, _)| path == file))
    }
}

/// Split a canonical `path:qualified:name` identifier at its first colon.
pub fn split_canonical(id: &str) -> Option<(&str, &str)> {
    id.split_once(':')
}
