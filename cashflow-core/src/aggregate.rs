//! Cash-flow aggregation across sources.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::format_amount;
use crate::normalizer::{sum_contributions, Normalized};
use crate::roles::Strategy;
use crate::warning::Warning;

/// Per-source contributions plus grand totals. Sources keep input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSummary {
    pub sources: Vec<Normalized>,
    /// Files that never made it to a table.
    pub load_failures: Vec<Warning>,
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
}

impl CashFlowSummary {
    pub fn from_results(sources: Vec<Normalized>) -> Self {
        Self::with_load_failures(sources, Vec::new())
    }

    pub fn with_load_failures(mut sources: Vec<Normalized>, load_failures: Vec<Warning>) -> Self {
        // Overflowing the grand total means some source is absurd; drop the
        // largest contributors until the rest fits.
        let (total_inflow, total_outflow) = loop {
            if let Some(totals) = sum_contributions(sources.iter()) {
                break totals;
            }
            let worst = sources
                .iter()
                .enumerate()
                .max_by_key(|(_, s)| s.inflow.max(s.outflow))
                .map(|(i, _)| i);
            let Some(i) = worst else {
                break (Decimal::ZERO, Decimal::ZERO);
            };
            let s = &mut sources[i];
            log::warn!("{}: dropped from totals (overflow)", s.source);
            s.warnings.push(Warning::NonFiniteTotal {
                column: s.strategy.label().to_string(),
            });
            s.strategy = Strategy::None;
            s.inflow = Decimal::ZERO;
            s.outflow = Decimal::ZERO;
            s.net = None;
        };

        Self {
            sources,
            load_failures,
            total_inflow,
            total_outflow,
        }
    }

    pub fn net(&self) -> Decimal {
        self.total_inflow - self.total_outflow
    }

    /// Sources that could not be summarized.
    pub fn unresolved(&self) -> impl Iterator<Item = &Normalized> {
        self.sources.iter().filter(|s| s.strategy == Strategy::None)
    }

    /// One block per source, then the totals. Same input, same text.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        for s in &self.sources {
            lines.push(format!("Bank: {}, Rows: {}", s.source, s.row_count));

            for w in &s.warnings {
                if matches!(w, Warning::HeaderNotFound { .. }) {
                    lines.push(format!("  - {w}"));
                }
            }

            match &s.strategy {
                Strategy::Amount { column } => {
                    let net = s.net.unwrap_or_else(|| s.balance());
                    lines.push(format!("  - Net amount ({column}): {}", format_amount(net)));
                    lines.push(format!("  - Out: {}", format_amount(s.outflow)));
                    lines.push(format!("  - In: {}", format_amount(s.inflow)));
                }
                Strategy::DebitCredit { debit, credit } => {
                    lines.push(format!("  - Out ({debit}): {}", format_amount(s.outflow)));
                    lines.push(format!("  - In ({credit}): {}", format_amount(s.inflow)));
                }
                Strategy::None => {}
            }

            for w in &s.warnings {
                if !matches!(w, Warning::HeaderNotFound { .. }) {
                    lines.push(format!("  - {w}"));
                }
            }
        }

        for w in &self.load_failures {
            lines.push(format!("- {w}"));
        }

        lines.push(String::new());
        lines.push(format!("**Total Inflow**: {}", format_amount(self.total_inflow)));
        lines.push(format!("**Total Outflow**: {}", format_amount(self.total_outflow)));
        lines.join("\n")
    }
}
