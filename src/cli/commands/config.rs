//! Config Command
//!
//! Manage reposcope configuration.
//!
//! Usage:
//!   reposcope config show [-g] [-f text|json]
//!   reposcope config path
//!   reposcope config init [-g] [--force]

use std::path::Path;

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: &str) -> Result<()> {
    let as_json = format == "json";

    if global {
        if let Some(global_path) = ConfigLoader::global_config_path() {
            if global_path.exists() {
                let content = std::fs::read_to_string(&global_path)?;
                println!("# Global Config: {}\n", global_path.display());
                println!("{}", content);
            } else {
                println!("No global config found.");
                println!("Run 'reposcope config init --global' to create one.");
            }
        } else {
            println!("Cannot determine global config directory.");
        }
    } else {
        ConfigLoader::show_config(as_json)?;
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let config_path = ConfigLoader::init_global(force)?;
    let out = Output::new();
    out.success("Initialized global configuration");
    out.field("Config", config_path.display());
    Ok(())
}

/// Initialize project configuration in the current directory
pub fn init_project(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    init_project_at(&root, force)
}

fn init_project_at(root: &Path, force: bool) -> Result<()> {
    let config_path = ConfigLoader::init_project(root, force)?;
    let out = Output::new();
    out.success("Initialized project configuration");
    out.field("Config", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_project_at_writes_default() {
        let dir = TempDir::new().unwrap();
        init_project_at(dir.path(), false).unwrap();

        let written = dir.path().join(".reposcope/config.toml");
        let config = ConfigLoader::load_from_file(&written).unwrap();
        assert_eq!(config.diagram.command, "pyreverse");
    }
}
