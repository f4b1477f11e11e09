//! Classes Command
//!
//! Rebuild class views through the diagram generator and print them.
//!
//! Usage:
//!   reposcope classes [PATH] [--triples]

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analyzer::RepositoryModel;
use crate::config::ConfigLoader;
use crate::diagram::{DiagramGenerator, PyreverseGenerator};
use crate::storage::{Triple, class_graph_triples, symbol_triples};
use crate::types::{ClassGraph, Result};

pub async fn run(path: Option<PathBuf>, triples: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    let generator = PyreverseGenerator::new(&config.diagram);
    let model = RepositoryModel::new(&root, config);

    let text = if triples {
        render_triples(&model, &generator).await?
    } else {
        let graph = model.rebuild_class_views(&generator).await?;
        log_graph(&graph, model.root());
        serde_json::to_string_pretty(&graph)?
    };

    println!("{}", text);
    Ok(())
}

/// Class and symbol triples as a JSON array.
///
/// A diagram tool failure only drops the class half.
pub async fn render_triples(
    model: &RepositoryModel,
    generator: &dyn DiagramGenerator,
) -> Result<String> {
    let mut triples: Vec<Triple> = Vec::new();
    let mut symbols = model.generate_symbols()?;

    match model.rebuild_class_views(generator).await {
        Ok(graph) => {
            log_graph(&graph, model.root());
            triples.extend(class_graph_triples(&graph)?);
            symbols = model.align_symbols(&graph, symbols)?;
            let joined = symbols
                .iter()
                .filter(|s| graph.classes_in_file(&s.file).next().is_some())
                .count();
            debug!("{} files share identifiers with the class graph", joined);
        }
        Err(e) if e.is_external() => {
            warn!("Skipping class triples: {}", e);
        }
        Err(e) => return Err(e),
    }

    for file in &symbols {
        triples.extend(symbol_triples(file)?);
    }

    Ok(serde_json::to_string_pretty(&triples)?)
}

fn log_graph(graph: &ClassGraph, root: &Path) {
    if graph.is_empty() {
        info!("No classes found under {}", root.display());
    } else {
        info!(
            "Reconciled {} classes and {} relationships under {}",
            graph.classes.len(),
            graph.relationships.len(),
            graph.root_path
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diagram::DiagramArtifacts;
    use crate::types::ScopeError;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct StaticGenerator(Option<&'static str>);

    #[async_trait]
    impl DiagramGenerator for StaticGenerator {
        async fn generate(&self, _root: &Path) -> Result<DiagramArtifacts> {
            match self.0 {
                Some(text) => Ok(DiagramArtifacts {
                    class_text: text.to_string(),
                    package_text: String::new(),
                }),
                None => Err(ScopeError::diagram_tool("static", "not installed")),
            }
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("core.py"), "class Engine:\n    pass\n\ndef start():\n    pass\n")
            .unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_render_triples() {
        let (_dir, root) = project();
        let model = RepositoryModel::new(&root, Config::default());
        let generator = StaticGenerator(Some(r#""app.core.Engine" [label=<{Engine||}>];"#));

        let json = render_triples(&model, &generator).await.unwrap();
        let triples: Vec<Triple> = serde_json::from_str(&json).unwrap();

        let class_subject = triples.iter().find(|t| t.predicate == "is").unwrap();
        let has_class = triples.iter().find(|t| t.predicate == "has_class").unwrap();
        assert_eq!(class_subject.subject, "app/core.py:Engine");
        assert_eq!(class_subject.subject, has_class.object);
        assert_eq!(has_class.subject, "app/core.py");
        assert!(triples.contains(&Triple::new("app/core.py", "has_function", "app/core.py:start")));
    }

    #[tokio::test]
    async fn test_render_triples_without_diagram_tool() {
        let (_dir, root) = project();
        let model = RepositoryModel::new(&root, Config::default());

        let json = render_triples(&model, &StaticGenerator(None)).await.unwrap();
        let triples: Vec<Triple> = serde_json::from_str(&json).unwrap();

        assert!(triples.iter().all(|t| t.predicate != "is"));
        assert!(triples.contains(&Triple::new("core.py", "has_class", "core.py:Engine")));
    }
}
