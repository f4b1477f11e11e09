//! External diagram generator
//!
//! Runs the structural-analysis tool (`pyreverse -o dot` by default) over a
//! root directory and hands back the text of the artifacts it writes. The
//! artifacts live in the analyzed tree, so they are removed again on every
//! exit path.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::DiagramConfig;
use crate::constants::diagram::{CLASSES_FILE, PACKAGES_FILE};
use crate::types::{Result, ScopeError};

/// Raw diagram text produced for one root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramArtifacts {
    pub class_text: String,
    pub package_text: String,
}

/// Source of diagram text for a directory tree
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    async fn generate(&self, root: &Path) -> Result<DiagramArtifacts>;

    fn name(&self) -> &str;
}

/// Shells out to pyreverse (or a compatible command)
pub struct PyreverseGenerator {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl PyreverseGenerator {
    pub fn new(config: &DiagramConfig) -> Self {
        Self::with_command(&config.command, Duration::from_secs(config.timeout_secs))
    }

    /// `command` may carry leading arguments, e.g. `python -m pylint.pyreverse`.
    pub fn with_command(command: &str, timeout: Duration) -> Self {
        let mut parts = command.split_whitespace().map(String::from);
        Self {
            program: parts.next().unwrap_or_default(),
            leading_args: parts.collect(),
            timeout,
        }
    }
}

#[async_trait]
impl DiagramGenerator for PyreverseGenerator {
    async fn generate(&self, root: &Path) -> Result<DiagramArtifacts> {
        if self.program.is_empty() {
            return Err(ScopeError::diagram_tool("", "no command configured"));
        }

        let _guard = ArtifactGuard::new(root)?;

        info!("Running {} on {}", self.program, root.display());

        let child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(root)
            .arg("-o")
            .arg("dot")
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ScopeError::diagram_tool(
                    &self.program,
                    format!("failed to spawn: {}. Is it installed?", e),
                )
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScopeError::timeout(&self.program, self.timeout))?
            .map_err(|e| ScopeError::diagram_tool(&self.program, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(ScopeError::diagram_tool(&self.program, message));
        }

        Ok(DiagramArtifacts {
            class_text: read_artifact(&root.join(CLASSES_FILE)).await?,
            package_text: read_artifact(&root.join(PACKAGES_FILE)).await?,
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Missing artifacts read as empty text; the tool skips them for class-free trees.
async fn read_artifact(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No artifact at {}", path.display());
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Clears the tool's artifacts from `root` on creation and again when dropped.
struct ArtifactGuard {
    paths: [PathBuf; 2],
}

impl ArtifactGuard {
    /// Fails if a leftover artifact cannot be removed.
    fn new(root: &Path) -> Result<Self> {
        let guard = Self {
            paths: [root.join(CLASSES_FILE), root.join(PACKAGES_FILE)],
        };
        for path in &guard.paths {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed stale {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(guard)
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => debug!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}
