//! Find a source's files under the data directory.

use glob::{glob, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::SourceConfig;
use crate::error::LoadError;

/// Sorted, de-duplicated files matching any of the source's patterns,
/// minus excluded names.
pub fn discover_files(data_dir: &Path, source: &SourceConfig) -> Result<Vec<PathBuf>, LoadError> {
    let base = Pattern::escape(&data_dir.to_string_lossy());
    let mut found = BTreeSet::new();

    for pat in &source.patterns {
        let full = format!("{}/{}", base.trim_end_matches('/'), pat);
        let paths = glob(&full).map_err(|source| LoadError::Pattern {
            pattern: full.clone(),
            source,
        })?;

        for entry in paths {
            match entry {
                Ok(p) if p.is_file() => {
                    found.insert(p);
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable path: {e}"),
            }
        }
    }

    Ok(found
        .into_iter()
        .filter(|p| !is_excluded(p, &source.exclude))
        .collect())
}

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    exclude.iter().any(|x| name.contains(x.as_str()))
}
