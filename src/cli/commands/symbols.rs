//! Symbols Command
//!
//! Extract per-file symbol tables and write the structure dump.
//!
//! Usage:
//!   reposcope symbols [PATH] [--format json|csv] [--output FILE]

use std::path::PathBuf;

use crate::analyzer::RepositoryModel;
use crate::cli::Output;
use crate::config::{ConfigLoader, OutputFormat};
use crate::types::{FileSymbols, Result};

pub struct SymbolsOptions {
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

/// Counts shown after a run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SymbolsSummary {
    pub files: usize,
    pub empty_files: usize,
    pub classes: usize,
    pub functions: usize,
    pub entry_points: usize,
}

impl SymbolsSummary {
    pub fn from_symbols(symbols: &[FileSymbols]) -> Self {
        symbols.iter().fold(Self::default(), |mut acc, file| {
            acc.files += 1;
            if file.is_empty() {
                acc.empty_files += 1;
            }
            acc.classes += file.classes.len();
            acc.functions += file.functions.len();
            acc.entry_points += file.main_entry_blocks().count();
            acc
        })
    }
}

pub fn run(options: SymbolsOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    let format = options.format.unwrap_or(config.output.format);
    let root = options.path.unwrap_or_else(|| PathBuf::from("."));
    let out = Output::quiet(options.quiet);

    let model = RepositoryModel::new(&root, config);
    let symbols = model.generate_symbols()?;
    let path = model.write_structure(&symbols, options.output.as_deref(), format)?;

    let summary = SymbolsSummary::from_symbols(&symbols);
    out.section("Symbol extraction");
    out.field("Root", root.display());
    out.field("Files", summary.files);
    out.field("Classes", summary.classes);
    out.field("Functions", summary.functions);
    out.field("Entry points", summary.entry_points);
    if summary.empty_files > 0 {
        out.warning(&format!(
            "{} files produced no symbols (unsupported language or parse failure)",
            summary.empty_files
        ));
    }
    out.success(&format!("Wrote {} ({})", path.display(), format));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockKind, ClassSymbols, CodeBlock};

    #[test]
    fn test_summary_counts() {
        let symbols = vec![
            FileSymbols {
                file: "main.py".into(),
                classes: vec![ClassSymbols {
                    name: "App".into(),
                    methods: vec![],
                }],
                functions: vec!["main".into(), "helper".into()],
                globals: vec![],
                page_blocks: vec![
                    CodeBlock::new(BlockKind::Conditional, 5, 6)
                        .with_tokens(vec!["__name__".into(), "__main__".into()]),
                ],
            },
            FileSymbols::empty("web.js"),
        ];

        assert_eq!(
            SymbolsSummary::from_symbols(&symbols),
            SymbolsSummary {
                files: 2,
                empty_files: 1,
                classes: 1,
                functions: 2,
                entry_points: 1,
            }
        );
    }
}
