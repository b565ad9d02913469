//! cashflow-core: statement normalization and cash-flow aggregation.
//!
//! Raw tables come in from loaders tagged with their source; each goes
//! through header detection, column role resolution and locale-aware
//! parsing, and the per-source results fold into a [`CashFlowSummary`].

pub mod aggregate;
pub mod format;
pub mod header;
pub mod locale;
pub mod normalizer;
pub mod roles;
pub mod table;
pub mod warning;

pub use aggregate::CashFlowSummary;
pub use format::{format_amount, format_grouped};
pub use header::{locate_header, HeaderLocation, HeaderPredicate, KeywordHeaderPredicate, HEADER_SEARCH_WINDOW};
pub use locale::{parse_cell, parse_column, parse_locale_amount, ParsedColumn};
pub use normalizer::{normalize_statement, HeaderResolved, Loaded, Normalized, RoleResolved, SourceProfile};
pub use roles::{resolve_roles, ColumnRoleSet, RoleKeywords, Strategy};
pub use table::{Cell, NormalizedTable, RawTable, SourceTable, SourceTag};
pub use warning::Warning;

pub use rust_decimal::Decimal;

/// Normalize every source with its profile and aggregate, in input order.
pub fn summarize<'a>(
    inputs: impl IntoIterator<Item = (SourceTable, &'a SourceProfile)>,
) -> CashFlowSummary {
    let results = inputs
        .into_iter()
        .map(|(table, profile)| normalize_statement(table, profile))
        .collect();
    CashFlowSummary::from_results(results)
}
