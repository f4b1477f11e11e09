//! Repository Model Builder
//!
//! Façade over the scanner, the symbol extractor and the diagram pipeline.
//! Symbol extraction and class-view rebuilding are independent: a failing
//! diagram tool never costs the symbol half of a run.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::parser::create_parser_for_path;
use super::scanner::{FileScanner, ScannedFile};
use crate::config::{Config, OutputFormat};
use crate::diagram::{self, DiagramGenerator};
use crate::storage::structure;
use crate::types::{ClassGraph, FileSymbols, Result, ScopeError, log_filter_warn};

pub struct RepositoryModel {
    root: PathBuf,
    config: Config,
}

impl RepositoryModel {
    pub fn new<P: AsRef<Path>>(root: P, config: Config) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Symbol tables of every selected file, in scanner order.
    pub fn generate_symbols(&self) -> Result<Vec<FileSymbols>> {
        let files = FileScanner::from_config(&self.root, &self.config.analysis)?.scan()?;
        info!("Extracting symbols from {} files", files.len());
        Ok(extract_parallel(&files, self.config.analysis.workers))
    }

    /// Write the structure dump and return where it went.
    ///
    /// Without `output` the file lands in the root as
    /// `<root-name>-structure.<json|csv>`.
    pub fn generate_structure(
        &self,
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let symbols = self.generate_symbols()?;
        self.write_structure(&symbols, output, format)
    }

    /// Write already extracted symbols, returning the destination path.
    pub fn write_structure(
        &self,
        symbols: &[FileSymbols],
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => structure::default_output_path(&self.root, format),
        };
        structure::write_structure(symbols, &path, format)?;
        info!("Wrote {} file records to {}", symbols.len(), path.display());
        Ok(path)
    }

    /// Run the diagram generator and reconcile its output against the tree.
    pub async fn rebuild_class_views(&self, generator: &dyn DiagramGenerator) -> Result<ClassGraph> {
        if !self.root.is_dir() {
            return Err(ScopeError::Scan(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        let artifacts = generator.generate(&self.root).await?;
        let raw = diagram::ingest(&artifacts.class_text);
        debug!(
            "Ingested {} classes and {} relationships from {}",
            raw.classes.len(),
            raw.relationships.len(),
            generator.name()
        );

        diagram::reconcile(raw, &self.root)
    }

    /// Re-key symbol tables so `file` matches the file part of `graph`'s
    /// canonical identifiers, making `ClassGraph::classes_in_file` a join.
    pub fn align_symbols(
        &self,
        graph: &ClassGraph,
        symbols: Vec<FileSymbols>,
    ) -> Result<Vec<FileSymbols>> {
        let offset = diagram::root_offset(&self.root, &graph.root_path)?;
        debug!("Aligning {} symbol tables under '{}'", symbols.len(), offset);
        Ok(symbols.into_iter().map(|s| s.rebased(&offset)).collect())
    }
}

/// Per-file extraction on a sized pool, falling back to sequential.
fn extract_parallel(files: &[ScannedFile], workers: usize) -> Vec<FileSymbols> {
    if files.is_empty() {
        return vec![];
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build();

    match pool {
        Ok(pool) => pool.install(|| files.par_iter().map(extract_file).collect()),
        Err(e) => {
            warn!("Thread pool unavailable ({}), extracting sequentially", e);
            files.iter().map(extract_file).collect()
        }
    }
}

/// Extract one file. Unreadable or unparsable files yield an empty record.
pub fn extract_file(file: &ScannedFile) -> FileSymbols {
    let Some(parser) = create_parser_for_path(&file.relative) else {
        return FileSymbols::empty(&file.relative);
    };

    let Some(content) = log_filter_warn(std::fs::read_to_string(&file.path), &file.relative)
    else {
        return FileSymbols::empty(&file.relative);
    };

    parser
        .parse(&file.relative, &content)
        .unwrap_or_else(|e| {
            warn!("{}", e);
            FileSymbols::empty(&file.relative)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramArtifacts;
    use crate::types::RelationshipKind;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("shop");
        fs::create_dir_all(root.join("orders")).unwrap();
        fs::write(root.join("orders/__init__.py"), "").unwrap();
        fs::write(
            root.join("orders/model.py"),
            "class Line:\n    pass\n\nclass Order:\n    def total(self):\n        return 0\n",
        )
        .unwrap();
        fs::write(root.join("orders/broken.py"), "def broken(:\n").unwrap();
        fs::write(root.join("app.js"), "console.log('hi');\n").unwrap();
        fs::write(
            root.join("main.py"),
            "from orders.model import Order\n\nif __name__ == '__main__':\n    Order()\n",
        )
        .unwrap();
        (dir, root)
    }

    #[test]
    fn test_generate_symbols() {
        let (_dir, root) = project();
        let model = RepositoryModel::new(&root, Config::default());
        let symbols = model.generate_symbols().unwrap();

        let files: Vec<_> = symbols.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "app.js",
                "main.py",
                "orders/__init__.py",
                "orders/broken.py",
                "orders/model.py",
            ]
        );

        assert!(symbols[0].is_empty());
        assert_eq!(symbols[1].main_entry_blocks().count(), 1);
        assert!(symbols[3].is_empty());
        assert_eq!(symbols[4].classes.len(), 2);
        assert_eq!(symbols[4].classes[1].methods, vec!["total"]);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let (_dir, root) = project();
        let files = FileScanner::new(&root).scan().unwrap();
        assert_eq!(extract_parallel(&files, 1), extract_parallel(&files, 8));
        assert!(extract_parallel(&[], 4).is_empty());
    }

    #[test]
    fn test_generate_structure_default_path() {
        let (_dir, root) = project();
        let model = RepositoryModel::new(&root, Config::default());

        let path = model.generate_structure(None, OutputFormat::Json).unwrap();
        assert_eq!(path, root.join("shop-structure.json"));

        let written: Vec<FileSymbols> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 5);
    }

    struct FakeGenerator {
        class_text: String,
    }

    #[async_trait]
    impl DiagramGenerator for FakeGenerator {
        async fn generate(&self, _root: &Path) -> Result<DiagramArtifacts> {
            Ok(DiagramArtifacts {
                class_text: self.class_text.clone(),
                package_text: String::new(),
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl DiagramGenerator for FailingGenerator {
        async fn generate(&self, _root: &Path) -> Result<DiagramArtifacts> {
            Err(ScopeError::diagram_tool("fake", "exit status 1"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_rebuild_class_views() {
        let (_dir, root) = project();
        let generator = FakeGenerator {
            class_text: [
                r#""shop.orders.model.Line" [label=<{Line||}>];"#,
                r#""shop.orders.model.Order" [label=<{Order|lines : list[Line]<br ALIGN="LEFT"/>|total(): int<br ALIGN="LEFT"/>}>];"#,
                r#""shop.orders.model.Line" -> "shop.orders.model.Order" [arrowhead="diamond", label="lines"];"#,
            ]
            .join("\n"),
        };

        let model = RepositoryModel::new(&root, Config::default());
        let graph = model.rebuild_class_views(&generator).await.unwrap();

        assert_eq!(graph.classes[1].package, "shop/orders/model.py:Order");
        assert_eq!(graph.classes[1].compositions, vec!["Line"]);
        assert_eq!(graph.relationships[0].source, "shop/orders/model.py:Line");
        assert_eq!(graph.relationships[0].kind, Some(RelationshipKind::Composition));
        assert_eq!(graph.classes_in_file("shop/orders/model.py").count(), 2);
    }

    #[tokio::test]
    async fn test_aligned_symbols_join_class_views() {
        let (_dir, root) = project();
        let generator = FakeGenerator {
            class_text: [
                r#""shop.orders.model.Line" [label=<{Line||}>];"#,
                r#""shop.orders.model.Order" [label=<{Order||total(): int<br ALIGN="LEFT"/>}>];"#,
            ]
            .join("\n"),
        };

        let model = RepositoryModel::new(&root, Config::default());
        let graph = model.rebuild_class_views(&generator).await.unwrap();
        let symbols = model
            .align_symbols(&graph, model.generate_symbols().unwrap())
            .unwrap();

        let module = symbols
            .iter()
            .find(|s| s.file.ends_with("orders/model.py"))
            .unwrap();
        assert_eq!(module.file, "shop/orders/model.py");

        let joined: Vec<_> = graph
            .classes_in_file(&module.file)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(joined, vec!["Line", "Order"]);
        assert_eq!(
            module.classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            joined
        );
    }

    #[tokio::test]
    async fn test_rebuild_without_classes_is_empty() {
        let (_dir, root) = project();
        let generator = FakeGenerator {
            class_text: "digraph \"classes\" {\n}\n".to_string(),
        };
        let model = RepositoryModel::new(&root, Config::default());
        let graph = model.rebuild_class_views(&generator).await.unwrap();
        assert!(graph.is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_is_external() {
        let (_dir, root) = project();
        let model = RepositoryModel::new(&root, Config::default());

        let err = model.rebuild_class_views(&FailingGenerator).await.unwrap_err();
        assert!(err.is_external());

        // Symbol extraction is unaffected
        assert_eq!(model.generate_symbols().unwrap().len(), 5);
    }
}
