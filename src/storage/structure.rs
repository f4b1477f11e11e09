//! Structure dumps of the per-file symbol tables.
//!
//! Document form is a pretty JSON array of file records. Tabular form is
//! CSV with one row per file; list columns hold their JSON encoding.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::types::{FileSymbols, Result};

const CSV_COLUMNS: [&str; 5] = ["file", "classes", "functions", "globals", "page_blocks"];

/// `<root>/<root-name>-structure.<ext>`
pub fn default_output_path(root: &Path, format: OutputFormat) -> PathBuf {
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "repository".to_string());
    root.join(format!("{}-structure.{}", name, format.extension()))
}

pub fn write_structure(symbols: &[FileSymbols], path: &Path, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => to_json(symbols)?,
        OutputFormat::Csv => to_csv(symbols)?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

pub fn to_json(symbols: &[FileSymbols]) -> Result<String> {
    Ok(serde_json::to_string_pretty(symbols)?)
}

pub fn to_csv(symbols: &[FileSymbols]) -> Result<String> {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');

    for record in symbols {
        let row = [
            record.file.clone(),
            serde_json::to_string(&record.classes)?,
            serde_json::to_string(&record.functions)?,
            serde_json::to_string(&record.globals)?,
            serde_json::to_string(&record.page_blocks)?,
        ];
        let escaped: Vec<String> = row.iter().map(|f| escape_csv(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    Ok(out)
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
