//! Header row detection.
//!
//! Some exports prepend metadata rows (account number, export date, bank
//! name) before the real column names. We scan a small window of leading
//! rows and promote the first one a [`HeaderPredicate`] accepts.

use crate::roles::RoleKeywords;
use crate::table::{NormalizedTable, RawTable};

/// Rows scanned when looking for the header.
pub const HEADER_SEARCH_WINDOW: usize = 10;

/// Decides whether a row (cells rendered as lower-case text) is a header.
pub trait HeaderPredicate {
    fn matches(&self, row: &[String]) -> bool;
}

impl<F> HeaderPredicate for F
where
    F: Fn(&[String]) -> bool,
{
    fn matches(&self, row: &[String]) -> bool {
        self(row)
    }
}

/// Accepts a row with an amount cell, or with both a debit and a credit
/// cell.
#[derive(Debug, Clone, Default)]
pub struct KeywordHeaderPredicate {
    keywords: RoleKeywords,
}

impl KeywordHeaderPredicate {
    pub fn new(keywords: RoleKeywords) -> Self {
        Self { keywords }
    }
}

impl HeaderPredicate for KeywordHeaderPredicate {
    fn matches(&self, row: &[String]) -> bool {
        let kw = &self.keywords;
        row.iter().any(|c| kw.is_amount(c))
            || (row.iter().any(|c| kw.is_debit(c)) && row.iter().any(|c| kw.is_credit(c)))
    }
}

/// Result of header detection.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLocation {
    pub table: NormalizedTable,
    /// Row promoted to header, or `None` when existing labels were kept.
    pub header_row: Option<usize>,
}

/// Find the header within the first `window` rows.
///
/// On a match at row `i`, row `i` becomes the header and rows `0..=i` are
/// dropped. Otherwise the loader's labels stay and every row is data.
pub fn locate_header(
    table: &RawTable,
    predicate: &dyn HeaderPredicate,
    window: usize,
) -> HeaderLocation {
    for (i, row) in table.rows.iter().take(window).enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.as_text().to_lowercase()).collect();
        if predicate.matches(&cells) {
            log::debug!("header found at row {i}: {cells:?}");
            let raw_headers: Vec<String> = row.iter().map(|c| c.as_text()).collect();
            return HeaderLocation {
                table: NormalizedTable::new(&raw_headers, table.rows[i + 1..].to_vec()),
                header_row: Some(i),
            };
        }
    }

    log::debug!("no header in first {window} rows; keeping existing labels");
    HeaderLocation {
        table: NormalizedTable::new(&table.effective_labels(), table.rows.clone()),
        header_row: None,
    }
}
