//! Diagram Ingestor
//!
//! Reads the line-oriented `dot` text the diagram tool writes and turns it
//! into class nodes and relationship edges. Lines of any other shape are
//! skipped; nothing here fails.
//!
//! A class line looks like:
//!
//! ```text
//! "pkg.mod.Foo" [color="black", label=<{Foo|a : int<br ALIGN="LEFT"/>|run(x: Bar)<br ALIGN="LEFT"/>}>, shape="record"];
//! ```
//!
//! and a relationship line like:
//!
//! ```text
//! "pkg.mod.Bar" -> "pkg.mod.Foo" [arrowhead="diamond", label="bar", style="solid"];
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{
    ClassGraph, ClassNode, MethodDescriptor, RelationshipEdge, RelationshipKind, TypeDescriptor,
};

const CLASS_MARKER: &str = "\" [";
const LABEL_OPEN: &str = "label=<{";
const LABEL_CLOSE: &str = "}>";

const ARROW: &str = " -> ";
const PROPS_OPEN: &str = " [";
const PROPS_CLOSE: &str = "];";
const EDGE_LABEL: &str = "label=\"";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br[^>]*>").expect("valid regex"));

/// Parse both halves of a diagram in one go.
pub fn ingest(text: &str) -> ClassGraph {
    ClassGraph::new(parse_class_views(text), parse_relationships(text))
}

/// Every class line, in input order.
pub fn parse_class_views(text: &str) -> Vec<ClassNode> {
    text.lines().filter_map(parse_class_line).collect()
}

/// Every relationship line, in input order.
pub fn parse_relationships(text: &str) -> Vec<RelationshipEdge> {
    text.lines().filter_map(parse_relationship_line).collect()
}

fn parse_class_line(line: &str) -> Option<ClassNode> {
    let (package, label) = split_class_line(line)?;

    let sections = split_unescaped_bars(&label);
    if sections.len() > 3 {
        debug!(
            package = %package,
            sections = sections.len(),
            "Skipping class line with unexpected label layout"
        );
        return None;
    }
    let mut sections = sections.into_iter();
    let name = sections.next().unwrap_or_default();
    let attributes = sections.next().unwrap_or_default();
    let methods = sections.next().unwrap_or_default();

    let mut class = ClassNode::new(name, package);
    for member in attributes.split('\n').filter(|m| !m.is_empty()) {
        class.add_attribute(TypeDescriptor::parse(member));
    }
    for method in methods.split('\n').filter(|m| !m.is_empty()) {
        class.add_method(MethodDescriptor::parse(method));
    }
    class.finalize();

    Some(class)
}

/// Raw package and line-broken label text of a class line.
fn split_class_line(line: &str) -> Option<(String, String)> {
    let marker = line.find(CLASS_MARKER)?;
    let package = line[..marker].replace('"', "");
    let rest = &line[marker..];

    let begin = rest.find(LABEL_OPEN)? + LABEL_OPEN.len();
    let end = rest.rfind(LABEL_CLOSE)?;
    if end < begin {
        return None;
    }

    let label = LINE_BREAK.replace_all(&rest[begin..end], "\n").into_owned();
    Some((package, label))
}

/// Split on `|` not preceded by a backslash. Escapes are kept as written.
fn split_unescaped_bars(label: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (i, c) in label.char_indices() {
        if c == '|' && prev != Some('\\') {
            parts.push(&label[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    parts.push(&label[start..]);
    parts
}

fn parse_relationship_line(line: &str) -> Option<RelationshipEdge> {
    let arrow = line.find(ARROW)?;
    let after_arrow = arrow + ARROW.len();
    let open = after_arrow + line[after_arrow..].find(PROPS_OPEN)?;
    let after_open = open + PROPS_OPEN.len();
    let close = after_open + line[after_open..].find(PROPS_CLOSE)?;

    let source = trim_endpoint(&line[..arrow]);
    let destination = trim_endpoint(&line[after_arrow..open]);
    let properties = line[after_open..close].trim();

    let kind = arrowhead_kind(properties);
    let label = kind
        .filter(RelationshipKind::is_labelled)
        .map(|_| edge_label(properties));

    Some(RelationshipEdge {
        source,
        destination,
        kind,
        label,
    })
}

fn trim_endpoint(s: &str) -> String {
    s.trim().trim_matches('"').to_string()
}

fn arrowhead_kind(properties: &str) -> Option<RelationshipKind> {
    // Order matters: `"diamond"` is checked with its quotes so `odiamond` never matches it
    [
        ("arrowhead=\"empty\"", RelationshipKind::Generalization),
        ("arrowhead=\"diamond\"", RelationshipKind::Composition),
        ("arrowhead=\"odiamond\"", RelationshipKind::Aggregation),
    ]
    .into_iter()
    .find(|(marker, _)| properties.contains(marker))
    .map(|(_, kind)| kind)
}

fn edge_label(properties: &str) -> String {
    let Some(begin) = properties.find(EDGE_LABEL).map(|i| i + EDGE_LABEL.len()) else {
        return String::new();
    };
    let rest = &properties[begin..];
    let end = rest.find('"').unwrap_or(rest.len());
    rest[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = r#"digraph "classes" {
rankdir=BT
charset="utf-8"
"metagpt.roles.role.Role" [color="black", fontcolor="black", label=<{Role|actions : list[Action]<br ALIGN="LEFT"/>name : str<br ALIGN="LEFT"/>rc : Optional[RoleContext]<br ALIGN="LEFT"/>|<I>act</I>(msg: Message): Message<br ALIGN="LEFT"/>run(env: Environment, rc: RoleContext): NoneType<br ALIGN="LEFT"/>}>, shape="record", style="solid"];
"metagpt.roles.role.RoleContext" [color="black", fontcolor="black", label=<{RoleContext|mode : Literal['a', 'b'] \| Mode<br ALIGN="LEFT"/>|}>, shape="record", style="solid"];
"metagpt.roles.engineer.Engineer" [color="black", fontcolor="black", label=<{Engineer|<br ALIGN="LEFT"/>|}>, shape="record", style="solid"];
"metagpt.roles.engineer.Engineer" -> "metagpt.roles.role.Role" [arrowhead="empty", arrowtail="none"];
"metagpt.roles.role.RoleContext" -> "metagpt.roles.role.Role" [arrowhead="diamond", arrowtail="none", fontcolor="green", label="rc", style="solid"];
"metagpt.actions.Action" -> "metagpt.roles.role.Role" [arrowhead="odiamond", arrowtail="none", fontcolor="green", label="actions", style="solid"];
"a.B" -> "a.C" [arrowhead="normal"];
}
"#;

    #[test]
    fn test_parse_class_views() {
        let classes = parse_class_views(DIAGRAM);
        assert_eq!(classes.len(), 3);

        let role = &classes[0];
        assert_eq!(role.name, "Role");
        assert_eq!(role.package, "metagpt.roles.role.Role");
        assert_eq!(
            role.attributes.keys().collect::<Vec<_>>(),
            vec!["actions", "name", "rc"]
        );
        assert_eq!(role.methods.keys().collect::<Vec<_>>(), vec!["act", "run"]);
        assert_eq!(role.compositions, vec!["Action", "RoleContext"]);
        assert_eq!(role.aggregations, vec!["Environment", "Message"]);
    }

    #[test]
    fn test_escaped_bar_kept_in_attribute() {
        let classes = parse_class_views(DIAGRAM);
        let ctx = &classes[1];
        let mode = &ctx.attributes["mode"];
        assert!(mode.type_expr.contains("\\|"));
        assert_eq!(ctx.compositions, vec!["Mode"]);
        assert!(ctx.methods.is_empty());
    }

    #[test]
    fn test_empty_sections() {
        let classes = parse_class_views(DIAGRAM);
        let engineer = &classes[2];
        assert_eq!(engineer.name, "Engineer");
        assert!(engineer.attributes.is_empty());
        assert!(engineer.methods.is_empty());
    }

    #[test]
    fn test_escaped_bar_in_default() {
        let text = [
            r#""p.m.A" [label=<{A|sep : str = 'a\|b'<br ALIGN="LEFT"/>x : Foo<br ALIGN="LEFT"/>|}>];"#,
            r#""p.m.Foo" -> "p.m.A" [arrowhead="diamond", label="x"];"#,
        ]
        .join("\n");

        let graph = ingest(&text);
        assert_eq!(graph.classes.len(), 1);

        let class = &graph.classes[0];
        let sep = &class.attributes["sep"];
        assert_eq!(sep.type_expr, "str");
        assert_eq!(sep.default_value, r"'a\|b'");
        assert_eq!(class.compositions, vec!["Foo"]);

        assert_eq!(graph.relationships.len(), 1);
        assert_eq!(graph.relationships[0].kind, Some(RelationshipKind::Composition));
        assert_eq!(graph.relationships[0].label.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_relationships() {
        let edges = parse_relationships(DIAGRAM);
        assert_eq!(edges.len(), 4);

        assert_eq!(edges[0].source, "metagpt.roles.engineer.Engineer");
        assert_eq!(edges[0].destination, "metagpt.roles.role.Role");
        assert_eq!(edges[0].kind, Some(RelationshipKind::Generalization));
        assert_eq!(edges[0].label, None);

        assert_eq!(edges[1].kind, Some(RelationshipKind::Composition));
        assert_eq!(edges[1].label.as_deref(), Some("rc"));

        assert_eq!(edges[2].kind, Some(RelationshipKind::Aggregation));
        assert_eq!(edges[2].label.as_deref(), Some("actions"));

        assert_eq!(edges[3].kind, None);
        assert_eq!(edges[3].label, None);
    }

    #[test]
    fn test_labelled_edge_without_label() {
        let edges = parse_relationships(r#""a.B" -> "a.C" [arrowhead="diamond"];"#);
        assert_eq!(edges[0].label.as_deref(), Some(""));
    }

    #[test]
    fn test_markers_out_of_order_skipped() {
        assert!(parse_relationships(r#"x ]; [ -> y"#).is_empty());
        assert!(parse_relationships("rankdir=BT").is_empty());
    }

    #[test]
    fn test_too_many_sections_skipped() {
        let line = r#""p.A" [label=<{A|x|y|z}>];"#;
        assert!(parse_class_views(line).is_empty());
    }

    #[test]
    fn test_ingest_combines_both() {
        let graph = ingest(DIAGRAM);
        assert_eq!(graph.classes.len(), 3);
        assert_eq!(graph.typed_relationships().count(), 3);
        assert!(graph.root_path.is_empty());
    }

    #[test]
    fn test_unescaped_split() {
        assert_eq!(split_unescaped_bars(r"a|b\|c|"), vec!["a", r"b\|c", ""]);
    }
}
