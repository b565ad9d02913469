//! Per-source normalization pipeline.
//!
//! Each stage is its own type and transitions consume the previous stage:
//!
//! `Loaded -> HeaderResolved -> RoleResolved -> Normalized`
//!
//! Nothing here returns an error. A stage that cannot do its job records a
//! [`Warning`] and the table ends up with `Strategy::None`, contributing
//! zero to both totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::header::{locate_header, HeaderPredicate, KeywordHeaderPredicate, HEADER_SEARCH_WINDOW};
use crate::locale::{checked_sum, parse_column, ParsedColumn};
use crate::roles::{resolve_roles, ColumnRoleSet, RoleKeywords, Strategy};
use crate::table::{NormalizedTable, RawTable, SourceTable, SourceTag};
use crate::warning::Warning;

/// Per-source normalization settings.
pub struct SourceProfile {
    pub keywords: RoleKeywords,
    pub header_window: usize,
    predicate: Box<dyn HeaderPredicate>,
}

impl SourceProfile {
    /// Header detection and role resolution both driven by `keywords`.
    pub fn new(keywords: RoleKeywords) -> Self {
        Self {
            predicate: Box::new(KeywordHeaderPredicate::new(keywords.clone())),
            keywords,
            header_window: HEADER_SEARCH_WINDOW,
        }
    }

    pub fn with_predicate(mut self, predicate: impl HeaderPredicate + 'static) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn with_header_window(mut self, rows: usize) -> Self {
        self.header_window = rows;
        self
    }

    pub fn predicate(&self) -> &dyn HeaderPredicate {
        self.predicate.as_ref()
    }
}

impl Default for SourceProfile {
    fn default() -> Self {
        Self::new(RoleKeywords::default())
    }
}

/// A tagged raw table, before anything has been inspected.
#[derive(Debug, Clone)]
pub struct Loaded {
    source: SourceTag,
    table: RawTable,
}

impl Loaded {
    pub fn new(input: SourceTable) -> Self {
        Self {
            source: input.source,
            table: input.table,
        }
    }

    pub fn source(&self) -> &SourceTag {
        &self.source
    }

    pub fn resolve_header(self, profile: &SourceProfile) -> HeaderResolved {
        let row_count = self.table.row_count();
        let loc = locate_header(&self.table, profile.predicate(), profile.header_window);

        let mut warnings = Vec::new();
        if loc.header_row.is_none() {
            log::warn!(
                "{}: no header in first {} rows",
                self.source,
                profile.header_window
            );
            warnings.push(Warning::HeaderNotFound {
                window: profile.header_window,
            });
        }

        HeaderResolved {
            source: self.source,
            row_count,
            header_row: loc.header_row,
            table: loc.table,
            warnings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeaderResolved {
    source: SourceTag,
    row_count: usize,
    header_row: Option<usize>,
    table: NormalizedTable,
    warnings: Vec<Warning>,
}

impl HeaderResolved {
    pub fn header_row(&self) -> Option<usize> {
        self.header_row
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn resolve_roles(self, profile: &SourceProfile) -> RoleResolved {
        let roles = resolve_roles(self.table.headers(), &profile.keywords);
        let strategy = roles.strategy(self.table.headers());
        log::debug!("{}: strategy {}", self.source, strategy.label());

        RoleResolved {
            source: self.source,
            row_count: self.row_count,
            table: self.table,
            roles,
            strategy,
            warnings: self.warnings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleResolved {
    source: SourceTag,
    row_count: usize,
    table: NormalizedTable,
    roles: ColumnRoleSet,
    strategy: Strategy,
    warnings: Vec<Warning>,
}

impl RoleResolved {
    pub fn roles(&self) -> ColumnRoleSet {
        self.roles
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Parse the selected column(s) and derive the two contributions.
    pub fn normalize(self) -> Normalized {
        let mut out = Normalized {
            source: self.source,
            row_count: self.row_count,
            strategy: Strategy::None,
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            net: None,
            warnings: self.warnings,
        };

        match (self.strategy, self.roles) {
            (Strategy::Amount { column }, ColumnRoleSet { amount: Some(idx), .. }) => {
                let parsed = parse_column(&self.table.column(idx));
                out.note_unparseable(&column, &parsed);

                match (parsed.split_by_sign(), parsed.sum()) {
                    (Some((inflow, outflow)), Some(net)) => {
                        out.inflow = inflow;
                        out.outflow = outflow;
                        out.net = Some(net);
                        out.strategy = Strategy::Amount { column };
                    }
                    _ => out.degrade(column),
                }
            }
            (
                Strategy::DebitCredit { debit, credit },
                ColumnRoleSet {
                    debit: Some(d),
                    credit: Some(c),
                    ..
                },
            ) => {
                let debits = parse_column(&self.table.column(d));
                let credits = parse_column(&self.table.column(c));
                out.note_unparseable(&debit, &debits);
                out.note_unparseable(&credit, &credits);

                match (debits.sum(), credits.sum()) {
                    (Some(outflow), Some(inflow)) => {
                        out.inflow = inflow;
                        out.outflow = outflow;
                        out.strategy = Strategy::DebitCredit { debit, credit };
                    }
                    (None, _) => out.degrade(debit),
                    (_, None) => out.degrade(credit),
                }
            }
            _ => {
                log::warn!("{}: no amount columns found", out.source);
                out.warnings.push(Warning::RoleNotResolved {
                    headers: self.table.headers().to_vec(),
                });
            }
        }

        out
    }
}

/// Terminal state: what one source contributes to the cash flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub source: SourceTag,
    /// Rows as loaded, before header promotion.
    pub row_count: usize,
    pub strategy: Strategy,
    pub inflow: Decimal,
    pub outflow: Decimal,
    /// Signed column sum; only for the amount strategy.
    pub net: Option<Decimal>,
    pub warnings: Vec<Warning>,
}

impl Normalized {
    fn note_unparseable(&mut self, column: &str, parsed: &ParsedColumn) {
        if parsed.unparseable > 0 {
            log::debug!(
                "{}: {} unparseable cell(s) in '{}'",
                self.source,
                parsed.unparseable,
                column
            );
            self.warnings.push(Warning::UnparseableCells {
                column: column.to_string(),
                count: parsed.unparseable,
            });
        }
    }

    fn degrade(&mut self, column: String) {
        log::warn!("{}: totals overflowed in '{}'", self.source, column);
        self.strategy = Strategy::None;
        self.inflow = Decimal::ZERO;
        self.outflow = Decimal::ZERO;
        self.net = None;
        self.warnings.push(Warning::NonFiniteTotal { column });
    }

    /// `inflow - outflow`, whichever strategy produced them.
    pub fn balance(&self) -> Decimal {
        self.inflow - self.outflow
    }
}

/// Run the whole pipeline for one source.
pub fn normalize_statement(input: SourceTable, profile: &SourceProfile) -> Normalized {
    Loaded::new(input)
        .resolve_header(profile)
        .resolve_roles(profile)
        .normalize()
}

/// Sum of contributions; `None` on overflow.
pub(crate) fn sum_contributions<'a>(
    results: impl Iterator<Item = &'a Normalized> + Clone,
) -> Option<(Decimal, Decimal)> {
    let inflow = checked_sum(results.clone().map(|r| r.inflow))?;
    let outflow = checked_sum(results.map(|r| r.outflow))?;
    Some((inflow, outflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from(*s)).collect()
    }

    fn source(name: &str, rows: Vec<Vec<Cell>>) -> SourceTable {
        SourceTable::new(SourceTag::new(name), RawTable::from_rows(rows))
    }

    #[test]
    fn test_amount_strategy_splits_by_sign() {
        let input = source(
            "Kuveyt",
            vec![
                row(&["Hesap No: 123"]),
                row(&["Tarih", "Açıklama", "Tutar", "Bakiye"]),
                row(&["01.01.2024", "EFT", "150,00", "150,00"]),
                row(&["02.01.2024", "POS", "-40,00", "110,00"]),
                row(&["03.01.2024", "FAST", "25,50", "135,50"]),
            ],
        );

        let n = normalize_statement(input, &SourceProfile::default());
        assert_eq!(n.strategy.label(), "amount");
        assert_eq!(n.row_count, 5);
        assert_eq!(n.inflow, Decimal::new(17550, 2));
        assert_eq!(n.outflow, Decimal::new(4000, 2));
        assert_eq!(n.net, Some(Decimal::new(13550, 2)));
        assert_eq!(n.balance(), n.net.unwrap());
        assert!(n.warnings.is_empty());
    }

    #[test]
    fn test_debit_credit_strategy() {
        let input = source(
            "Akbank",
            vec![
                row(&["Tarih", "Borç", "Alacak", "Bakiye"]),
                row(&["01.01.2024", "0", "200,00", "200,00"]),
                row(&["02.01.2024", "100,00", "0", "100,00"]),
            ],
        );

        let n = normalize_statement(input, &SourceProfile::default());
        assert_eq!(
            n.strategy,
            Strategy::DebitCredit {
                debit: "borç".to_string(),
                credit: "alacak".to_string()
            }
        );
        assert_eq!(n.inflow, Decimal::new(200, 0));
        assert_eq!(n.outflow, Decimal::new(100, 0));
        assert_eq!(n.net, None);
    }

    #[test]
    fn test_unresolved_roles_contribute_zero() {
        let input = source("Ziraat", vec![row(&["Tarih", "Açıklama"]), row(&["x", "y"])]);
        let n = normalize_statement(input, &SourceProfile::default());
        assert_eq!(n.strategy, Strategy::None);
        assert_eq!(n.inflow, Decimal::ZERO);
        assert_eq!(n.outflow, Decimal::ZERO);
        assert!(n.warnings.contains(&Warning::HeaderNotFound { window: 10 }));
        assert!(n
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::RoleNotResolved { .. })));
    }

    #[test]
    fn test_loader_labels_used_when_no_header_row() {
        let table = RawTable::new(
            vec!["Tarih".to_string(), "İşlem Tutarı".to_string()],
            vec![
                vec![Cell::from("01.01.2024"), Cell::Number(-12.5)],
                vec![Cell::from("02.01.2024"), Cell::Number(30.0)],
            ],
        );
        let n = normalize_statement(
            SourceTable::new(SourceTag::new("Ziraat"), table),
            &SourceProfile::default(),
        );
        assert_eq!(n.strategy.label(), "amount");
        assert_eq!(n.inflow, Decimal::new(30, 0));
        assert_eq!(n.outflow, Decimal::new(125, 1));
        assert_eq!(n.warnings, vec![Warning::HeaderNotFound { window: 10 }]);
    }

    #[test]
    fn test_footer_garbage_recorded_not_counted() {
        let input = source(
            "Kuveyt",
            vec![
                row(&["Tarih", "Tutar"]),
                row(&["01.01.2024", "1.000,00"]),
                row(&["Toplam", "yok"]),
            ],
        );
        let n = normalize_statement(input, &SourceProfile::default());
        assert_eq!(n.inflow, Decimal::new(1000, 0));
        assert_eq!(
            n.warnings,
            vec![Warning::UnparseableCells {
                column: "tutar".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_stages_expose_intermediate_state() {
        let profile = SourceProfile::default();
        let header = Loaded::new(source(
            "A",
            vec![row(&["meta"]), row(&["Debit", "Credit"]), row(&["1", "2"])],
        ))
        .resolve_header(&profile);
        assert_eq!(header.header_row(), Some(1));
        assert_eq!(header.table().headers(), &["debit", "credit"]);

        let roles = header.resolve_roles(&profile);
        assert_eq!(roles.roles().debit, Some(0));
        assert_eq!(roles.roles().credit, Some(1));
        assert_eq!(roles.normalize().inflow, Decimal::new(2, 0));
    }

    #[test]
    fn test_profile_predicate_overrides_keywords() {
        // "Hareket" marks the header row here; the keyword predicate would
        // stop at the earlier "Tutar Özeti" banner instead.
        let input = source(
            "Garanti",
            vec![
                row(&["Tutar Özeti"]),
                row(&["Hareket", "Tutar"]),
                row(&["x", "12,00"]),
                row(&["y", "-2,00"]),
            ],
        );
        let profile = SourceProfile::default()
            .with_predicate(|row: &[String]| row.first().is_some_and(|c| c == "hareket"));

        let n = normalize_statement(input, &profile);
        assert_eq!(
            n.strategy,
            Strategy::Amount {
                column: "tutar".to_string()
            }
        );
        assert_eq!(n.inflow, Decimal::new(12, 0));
        assert_eq!(n.outflow, Decimal::new(2, 0));
        assert!(n.warnings.is_empty());
    }

    #[test]
    fn test_overflow_degrades_to_none() {
        let huge = "79.228.162.514.264.337.593.543.950.335";
        let input = source("A", vec![row(&["Tutar"]), row(&[huge]), row(&[huge])]);
        let n = normalize_statement(input, &SourceProfile::default());
        assert_eq!(n.strategy, Strategy::None);
        assert_eq!(n.inflow, Decimal::ZERO);
        assert_eq!(
            n.warnings,
            vec![Warning::NonFiniteTotal {
                column: "tutar".to_string()
            }]
        );
    }
}
