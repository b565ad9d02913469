//! Per-institution source configuration.

use serde::{Deserialize, Serialize};

use cashflow_core::{RoleKeywords, SourceProfile, SourceTag, HEADER_SEARCH_WINDOW};

/// How files of a source are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadStrategy {
    /// HTML document with a spreadsheet extension; first `<table>` wins.
    HtmlTable,
    /// Spreadsheet whose column labels sit at a fixed row (0-based).
    OffsetHeaderSheet { header_row: usize },
    /// Spreadsheet (or CSV) with labels in the first row.
    NativeSheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name shown in the summary (e.g. "Kuveyt").
    pub tag: String,
    /// Glob patterns relative to the data directory.
    pub patterns: Vec<String>,
    /// File names containing any of these are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,
    pub strategy: LoadStrategy,
    #[serde(default)]
    pub keywords: RoleKeywords,
    #[serde(default = "default_header_window")]
    pub header_window: usize,
}

fn default_header_window() -> usize {
    HEADER_SEARCH_WINDOW
}

impl SourceConfig {
    pub fn new(tag: impl Into<String>, patterns: &[&str], strategy: LoadStrategy) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            exclude: Vec::new(),
            strategy,
            keywords: RoleKeywords::default(),
            header_window: HEADER_SEARCH_WINDOW,
        }
    }

    pub fn excluding(mut self, names: &[&str]) -> Self {
        self.exclude = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn source_tag(&self) -> SourceTag {
        SourceTag::new(self.tag.clone())
    }

    pub fn profile(&self) -> SourceProfile {
        SourceProfile::new(self.keywords.clone()).with_header_window(self.header_window)
    }
}

/// The three banks the reports are built from.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("Kuveyt", &["*Kuveyt*.xls"], LoadStrategy::HtmlTable),
        SourceConfig::new("Ziraat", &["*Ziraat*.xlsx"], LoadStrategy::HtmlTable),
        SourceConfig::new(
            "Akbank",
            &["*Akbank*.xlsx", "*Akka*.xlsx"],
            LoadStrategy::OffsetHeaderSheet { header_row: 9 },
        )
        .excluding(&["Ziraat"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let sources = default_sources();
        let tags: Vec<_> = sources.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["Kuveyt", "Ziraat", "Akbank"]);
        assert_eq!(
            sources[2].strategy,
            LoadStrategy::OffsetHeaderSheet { header_row: 9 }
        );
        assert_eq!(sources[2].exclude, vec!["Ziraat"]);
    }

    #[test]
    fn test_strategy_serde_shape() {
        let json = serde_json::to_string(&LoadStrategy::OffsetHeaderSheet { header_row: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"offset_header_sheet","header_row":3}"#);
    }

    #[test]
    fn test_keywords_default_when_omitted() {
        let cfg: SourceConfig = serde_json::from_str(
            r#"{"tag":"Garanti","patterns":["*Garanti*.csv"],"strategy":{"kind":"native_sheet"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.keywords, RoleKeywords::default());
        assert_eq!(cfg.header_window, 10);
        assert!(cfg.exclude.is_empty());
    }
}
