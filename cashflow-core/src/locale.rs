//! Locale-aware amount parsing.
//!
//! Statement exports write amounts as `1.234,56`: `.` groups thousands and
//! `,` is the decimal separator. Parsing is total; anything that does not
//! parse is "missing" and never becomes zero.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::table::Cell;

/// Parse one locale-formatted amount. Empty or garbage input yields `None`.
pub fn parse_locale_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let canonical = s.replace('.', "").replace(',', ".");
    Decimal::from_str_exact(&canonical).ok()
}

/// Parse a single cell. Numeric cells are already canonical.
pub fn parse_cell(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => Decimal::from_f64(*n),
        Cell::Text(s) => parse_locale_amount(s),
    }
}

/// A column after parsing: one entry per row, `None` for missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedColumn {
    pub values: Vec<Option<Decimal>>,
    /// Non-empty cells that could not be parsed.
    pub unparseable: usize,
}

impl ParsedColumn {
    pub fn present(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.values.iter().flatten().copied()
    }

    /// Sum of present values; `None` only on decimal overflow.
    pub fn sum(&self) -> Option<Decimal> {
        checked_sum(self.present())
    }

    /// (sum of positives, sum of |negatives|); `None` on overflow.
    pub fn split_by_sign(&self) -> Option<(Decimal, Decimal)> {
        let inflow = checked_sum(self.present().filter(|v| v.is_sign_positive() && !v.is_zero()))?;
        let outflow = checked_sum(self.present().filter(|v| v.is_sign_negative()).map(|v| v.abs()))?;
        Some((inflow, outflow))
    }
}

pub(crate) fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Parse a column of cells.
///
/// A column whose non-empty cells are all numeric passes through
/// unchanged; otherwise text cells go through the locale rule.
pub fn parse_column(cells: &[Cell]) -> ParsedColumn {
    let numeric = cells
        .iter()
        .all(|c| matches!(c, Cell::Empty | Cell::Number(_)));

    let mut unparseable = 0;
    let values = cells
        .iter()
        .map(|cell| {
            let parsed = if numeric {
                match cell {
                    Cell::Number(n) => Decimal::from_f64(*n),
                    _ => None,
                }
            } else {
                parse_cell(cell)
            };
            if parsed.is_none() && !cell.is_empty() {
                unparseable += 1;
            }
            parsed
        })
        .collect();

    ParsedColumn {
        values,
        unparseable,
    }
}
