//! cashflow-ingest: locate statement files per configured source and load
//! them into tagged raw tables.

pub mod config;
pub mod discovery;
pub mod error;
pub mod loaders;

pub use config::{default_sources, LoadStrategy, SourceConfig};
pub use discovery::discover_files;
pub use error::LoadError;
pub use loaders::load_table;

use std::path::{Path, PathBuf};

use cashflow_core::{normalize_statement, CashFlowSummary, SourceProfile, SourceTable, Warning};

/// A table read from disk, remembering which configured source it belongs to.
#[derive(Debug, Clone)]
pub struct LoadedStatement {
    pub path: PathBuf,
    pub source_index: usize,
    pub table: SourceTable,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub statements: Vec<LoadedStatement>,
    /// One `Warning::LoadFailure` per file (or pattern) that failed.
    pub failures: Vec<Warning>,
}

/// Load every file of every source. A failing file is logged and skipped.
pub fn load_sources(data_dir: &Path, sources: &[SourceConfig]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for (idx, source) in sources.iter().enumerate() {
        let files = match discover_files(data_dir, source) {
            Ok(files) => files,
            Err(e) => {
                log::error!("{}: {e}", source.tag);
                outcome.failures.push(Warning::LoadFailure {
                    file: source.patterns.join(", "),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if files.is_empty() {
            log::info!("{}: no files matching {:?}", source.tag, source.patterns);
        }

        for path in files {
            log::info!("Loading {} from {}", source.tag, path.display());
            match load_table(&path, &source.strategy) {
                Ok(table) => outcome.statements.push(LoadedStatement {
                    table: SourceTable::new(source.source_tag(), table),
                    path,
                    source_index: idx,
                }),
                Err(e) => {
                    log::error!("Error loading {}: {e}", display_name(&path));
                    outcome.failures.push(Warning::LoadFailure {
                        file: display_name(&path),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    outcome
}

/// Load, normalize and aggregate every configured source under `data_dir`.
pub fn summarize_sources(data_dir: &Path, sources: &[SourceConfig]) -> CashFlowSummary {
    let outcome = load_sources(data_dir, sources);
    let profiles: Vec<SourceProfile> = sources.iter().map(SourceConfig::profile).collect();

    let results = outcome
        .statements
        .into_iter()
        .map(|s| normalize_statement(s.table, &profiles[s.source_index]))
        .collect();

    CashFlowSummary::with_load_failures(results, outcome.failures)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
