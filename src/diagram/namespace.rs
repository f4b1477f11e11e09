//! Namespace Reconciler
//!
//! The diagram tool names classes by dotted package (`pkg.mod.Outer.Inner`);
//! the scanner names files by relative path (`pkg/mod.py`). Reconciliation
//! rewrites every class package and edge endpoint into the canonical
//! `pkg/mod.py:Outer:Inner` form so both views share one identifier space.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::types::{ClassGraph, Result, log_filter_error, to_slash};

/// Rewrite `graph` into canonical identifiers relative to `root`.
///
/// Identifiers that already contain `:` are treated as canonical and kept,
/// so reconciling twice is the same as reconciling once.
pub fn reconcile(mut graph: ClassGraph, root: &Path) -> Result<ClassGraph> {
    let Some(first) = graph.classes.first() else {
        return Ok(ClassGraph::default());
    };
    if is_reconciled(&graph) {
        return Ok(graph);
    }

    let root = root.canonicalize()?;
    let segments = path_segments(&root);
    let anchor = find_anchor(&segments, &first.package);

    let mut prefix = root.clone();
    for _ in anchor..segments.len() {
        prefix.pop();
    }
    debug!(root = %root.display(), prefix = %prefix.display(), "Anchored package namespace");

    let mappings = path_mappings(&root, &prefix);

    for class in &mut graph.classes {
        class.package = resolve(&class.package, &mappings);
    }
    for edge in &mut graph.relationships {
        edge.source = resolve(&edge.source, &mappings);
        edge.destination = resolve(&edge.destination, &mappings);
    }
    graph.root_path = to_slash(&prefix);

    Ok(graph)
}

/// Path of `root` relative to a reconciled graph's `root_path`, `/` separated.
///
/// Prefixing root-relative file paths with it yields the file part of the
/// graph's canonical identifiers. Empty when the graph carries no root path.
pub fn root_offset(root: &Path, root_path: &str) -> Result<String> {
    if root_path.is_empty() {
        return Ok(String::new());
    }
    let root = root.canonicalize()?;
    match root.strip_prefix(root_path) {
        Ok(offset) => Ok(to_slash(offset)),
        Err(_) => {
            warn!(
                root = %root.display(),
                root_path,
                "Root lies outside the graph's root path"
            );
            Ok(String::new())
        }
    }
}

fn is_canonical(id: &str) -> bool {
    id.contains(':')
}

fn is_reconciled(graph: &ClassGraph) -> bool {
    graph.classes.iter().all(|c| is_canonical(&c.package))
        && graph
            .relationships
            .iter()
            .all(|e| is_canonical(&e.source) && is_canonical(&e.destination))
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Index of the first root segment belonging to the package namespace.
///
/// The longest suffix of `segments` whose dotted form occurs in `package`
/// wins; without a match the last segment is used.
fn find_anchor(segments: &[String], package: &str) -> usize {
    (0..segments.len())
        .find(|&start| package.contains(&segments[start..].join(".")))
        .unwrap_or(segments.len().saturating_sub(1))
}

/// Dotted namespace to relative path for every directory and file under `root`.
///
/// Keys and values are relative to `prefix`. Files lose their extension in
/// the key only.
fn path_mappings(root: &Path, prefix: &Path) -> HashMap<String, String> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut mappings = HashMap::new();
    for entry in walker.filter_map(|e| log_filter_error(e, "Namespace walk entry")) {
        let Ok(relative) = entry.path().strip_prefix(prefix) else {
            continue;
        };
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        let keyed: PathBuf = if is_dir {
            relative.to_path_buf()
        } else {
            relative.with_extension("")
        };

        let key = path_segments(&keyed).join(".");
        if key.is_empty() {
            continue;
        }
        mappings.insert(key, to_slash(relative));
    }
    mappings
}

/// Strip trailing dotted segments until a mapped namespace is found.
fn resolve(id: &str, mappings: &HashMap<String, String>) -> String {
    if is_canonical(id) {
        return id.to_string();
    }

    let mut namespace = id;
    loop {
        if let Some(path) = mappings.get(namespace) {
            let remainder = id[namespace.len()..].trim_start_matches('.');
            return format!("{}:{}", path, remainder.replace('.', ":"));
        }
        match namespace.rfind('.') {
            Some(ix) => namespace = &namespace[..ix],
            None => break,
        }
    }

    warn!(identifier = %id, "No file matches package namespace, keeping it as is");
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassNode, RelationshipEdge, RelationshipKind};
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("shop");
        fs::create_dir_all(root.join("orders")).unwrap();
        fs::write(root.join("orders/__init__.py"), "").unwrap();
        fs::write(root.join("orders/model.py"), "class Order: pass\n").unwrap();
        fs::write(root.join("app.py"), "").unwrap();
        (dir, root)
    }

    fn graph() -> ClassGraph {
        ClassGraph::new(
            vec![
                ClassNode::new("Order", "shop.orders.model.Order"),
                ClassNode::new("Line", "shop.orders.model.Order.Line"),
                ClassNode::new("App", "shop.app.App"),
            ],
            vec![RelationshipEdge {
                source: "shop.orders.model.Order.Line".into(),
                destination: "shop.orders.model.Order".into(),
                kind: Some(RelationshipKind::Composition),
                label: Some("lines".into()),
            }],
        )
    }

    #[test]
    fn test_reconcile_rewrites_identifiers() {
        let (_dir, root) = project();
        let result = reconcile(graph(), &root).unwrap();

        let packages: Vec<_> = result.classes.iter().map(|c| c.package.as_str()).collect();
        assert_eq!(
            packages,
            vec![
                "shop/orders/model.py:Order",
                "shop/orders/model.py:Order:Line",
                "shop/app.py:App",
            ]
        );
        assert_eq!(result.relationships[0].source, "shop/orders/model.py:Order:Line");
        assert_eq!(result.relationships[0].destination, "shop/orders/model.py:Order");

        let prefix = to_slash(&root.canonicalize().unwrap().parent().unwrap().to_path_buf());
        assert_eq!(result.root_path, prefix);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let (_dir, root) = project();
        let once = reconcile(graph(), &root).unwrap();
        let twice = reconcile(once.clone(), &root).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unmatched_identifier_kept() {
        let (_dir, root) = project();
        let mut g = graph();
        g.relationships.push(RelationshipEdge {
            source: "elsewhere.Thing".into(),
            destination: "shop.app.App".into(),
            kind: None,
            label: None,
        });
        let result = reconcile(g, &root).unwrap();
        assert_eq!(result.relationships[1].source, "elsewhere.Thing");
        assert_eq!(result.relationships[1].destination, "shop/app.py:App");
    }

    #[test]
    fn test_no_classes_gives_empty_graph() {
        let (_dir, root) = project();
        let g = ClassGraph::new(vec![], graph().relationships);
        let result = reconcile(g, &root).unwrap();
        assert!(result.is_empty());
        assert!(result.root_path.is_empty());
    }

    #[test]
    fn test_root_offset() {
        let (_dir, root) = project();
        let graph = reconcile(graph(), &root).unwrap();

        assert_eq!(root_offset(&root, &graph.root_path).unwrap(), "shop");
        assert_eq!(root_offset(&root, "").unwrap(), "");
        assert_eq!(root_offset(&root, "/elsewhere").unwrap(), "");
    }

    #[test]
    fn test_find_anchor_prefers_longest_suffix() {
        let segments: Vec<String> = ["home", "dev", "src", "shop"].map(String::from).to_vec();
        assert_eq!(find_anchor(&segments, "src.shop.app.App"), 2);
        assert_eq!(find_anchor(&segments, "shop.app.App"), 3);
        assert_eq!(find_anchor(&segments, "unrelated.App"), 3);
        assert_eq!(find_anchor(&[], "x"), 0);
    }

    #[test]
    fn test_resolve_strips_segments() {
        let mappings = HashMap::from([
            ("pkg".to_string(), "pkg".to_string()),
            ("pkg.mod".to_string(), "pkg/mod.py".to_string()),
        ]);
        assert_eq!(resolve("pkg.mod.A.B", &mappings), "pkg/mod.py:A:B");
        assert_eq!(resolve("pkg.Init", &mappings), "pkg:Init");
        assert_eq!(resolve("pkg/mod.py:A", &mappings), "pkg/mod.py:A");
    }
}
