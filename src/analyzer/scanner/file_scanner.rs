use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::constants::analysis::{DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS, MAX_FILE_SIZE};
use crate::types::{Result, ScopeError, log_filter_error, to_slash};

/// Selects the source files of a tree by extension, exclude globs and size.
pub struct FileScanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: compile_patterns(DEFAULT_EXCLUDES.iter().copied()).unwrap_or_default(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Result<Self> {
        Self::new(root)
            .with_extensions(config.extensions.clone())
            .with_max_file_size(config.max_file_size)
            .with_exclude(&config.exclude)
    }

    /// Extensions without the leading dot; matched case-insensitively
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Glob patterns matched against `/`-separated paths relative to the root
    pub fn with_exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.exclude = compile_patterns(patterns.iter().map(|p| p.as_ref()))?;
        Ok(self)
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Selected files, sorted by relative path
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(ScopeError::Scan(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| log_filter_error(e, "Walk entry")) {
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let relative = to_slash(relative);

            if self.should_exclude(&relative) || !self.check_extension(path) {
                continue;
            }

            let Some(metadata) = log_filter_error(path.metadata(), "File metadata") else {
                continue;
            };
            if metadata.len() > self.max_file_size {
                tracing::debug!("Skipping large file: {} ({} bytes)", relative, metadata.len());
                continue;
            }

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative,
            });
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(files)
    }

    fn should_exclude(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }

    fn check_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

fn compile_patterns<'p>(patterns: impl Iterator<Item = &'p str>) -> Result<Vec<glob::Pattern>> {
    patterns
        .map(|p| {
            glob::Pattern::new(p)
                .map_err(|e| ScopeError::Config(format!("Invalid exclude pattern '{}': {}", p, e)))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, `/` separated
    pub relative: String,
}
