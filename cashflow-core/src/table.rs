//! Table model shared by loaders and the normalizer.
//!
//! Loaders hand us untyped cells; nothing here assumes a column sits at a
//! fixed position. Header names are for lookup only.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single untyped cell as produced by a loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text rendering used for header matching and labels.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Identifies the institution (or internal report) a table came from.
///
/// The set of institutions lives in configuration, so this is a string
/// newtype rather than a closed enum. There are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTag(String);

impl SourceTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rows of cells straight from a loader.
///
/// `labels` are whatever column names the loader already parsed (may be
/// empty when the loader read the file headerless).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { labels, rows }
    }

    /// Table with no loader-provided labels.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            labels: Vec::new(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest of the label row and every data row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.labels.len()))
            .max()
            .unwrap_or(0)
    }

    /// Loader labels, padded with positional names ("0", "1", ...) up to
    /// the table width.
    pub fn effective_labels(&self) -> Vec<String> {
        (0..self.width())
            .map(|i| self.labels.get(i).cloned().unwrap_or_else(|| i.to_string()))
            .collect()
    }
}

/// A raw table tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub source: SourceTag,
    pub table: RawTable,
}

impl SourceTable {
    pub fn new(source: SourceTag, table: RawTable) -> Self {
        Self { source, table }
    }
}

/// Header names promoted from a header row, plus the data rows below it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    /// Lower-cases and trims `raw_headers`, then makes them unique.
    pub fn new(raw_headers: &[String], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            headers: normalize_headers(raw_headers),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cells of column `idx`; short rows yield `Cell::Empty`.
    pub fn column(&self, idx: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect()
    }
}

fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, h) in raw.iter().enumerate() {
        let mut base = h.trim().to_lowercase();
        if base.is_empty() {
            base = format!("unnamed: {i}");
        }

        let mut name = base.clone();
        if taken.contains(&name) {
            // A literal "a.1" further left may already hold the next suffix.
            let n = next_suffix.entry(base.clone()).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{base}.{n}");
                if !taken.contains(&candidate) {
                    name = candidate;
                    break;
                }
            }
        }
        taken.insert(name.clone());
        out.push(name);
    }

    out
}
