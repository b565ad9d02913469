//! Internal accounting reports: column totals and top-N rankings.
//!
//! These exports already have their labels in the first row; the only
//! cleanup needed is dropping blank and subtotal ("TOPLAM") rows.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use cashflow_core::{parse_column, Cell, RawTable};

/// Rows whose name contains this (upper-cased) are subtotals.
pub const TOTAL_MARKER: &str = "TOPLAM";

pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: Decimal,
}

/// Total of a value column plus its largest rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedReport {
    pub total: Decimal,
    pub top: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub debit_total: Decimal,
    pub credit_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub quantity_in: Decimal,
    pub quantity_out: Decimal,
    pub value_in: Decimal,
    pub value_out: Decimal,
}

/// Case fold that also ignores the dot on Turkish i: `MİKTAR`, `MIKTAR`
/// and `Miktar` all fold to `miktar`.
fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'İ' | 'I' | 'ı' => 'i',
            c => c,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column lookup on trimmed, case-folded labels.
pub fn find_column(table: &RawTable, name: &str) -> Option<usize> {
    let wanted = fold_label(name);
    table.labels.iter().position(|l| fold_label(l) == wanted)
}

fn require_column(table: &RawTable, name: &str) -> Result<usize> {
    find_column(table, name).ok_or_else(|| anyhow!("column '{name}' not found"))
}

/// Rows with a non-empty name that is not a subtotal.
pub fn clean_rows(table: &RawTable, name_col: usize) -> Vec<&[Cell]> {
    table
        .rows
        .iter()
        .filter(|row| {
            let name = row.get(name_col).map(Cell::as_text).unwrap_or_default();
            !name.trim().is_empty() && !name.to_uppercase().contains(TOTAL_MARKER)
        })
        .map(Vec::as_slice)
        .collect()
}

fn column_values(rows: &[&[Cell]], idx: usize) -> Vec<Option<Decimal>> {
    let cells: Vec<Cell> = rows
        .iter()
        .map(|r| r.get(idx).cloned().unwrap_or_default())
        .collect();
    parse_column(&cells).values
}

fn total(values: &[Option<Decimal>], column: &str) -> Result<Decimal> {
    values
        .iter()
        .flatten()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| anyhow!("total of '{column}' overflows"))
}

/// Total of `value` over cleaned rows and the `top_n` largest by value.
pub fn ranked(table: &RawTable, name: &str, value: &str, top_n: usize) -> Result<RankedReport> {
    let name_col = require_column(table, name)?;
    let value_col = require_column(table, value)?;

    let rows = clean_rows(table, name_col);
    let values = column_values(&rows, value_col);

    let mut entries: Vec<RankedEntry> = rows
        .iter()
        .zip(&values)
        .filter_map(|(row, v)| {
            v.map(|value| RankedEntry {
                name: row.get(name_col).map(Cell::as_text).unwrap_or_default().trim().to_string(),
                value,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries.truncate(top_n);

    Ok(RankedReport {
        total: total(&values, value)?,
        top: entries,
    })
}

/// Debit balance total, and the credit balance total when the column exists.
pub fn balances(table: &RawTable, name: &str, debit: &str, credit: &str) -> Result<BalanceReport> {
    let name_col = require_column(table, name)?;
    let debit_col = require_column(table, debit)?;
    let rows = clean_rows(table, name_col);

    let credit_total = match find_column(table, credit) {
        Some(idx) => total(&column_values(&rows, idx), credit)?,
        None => Decimal::ZERO,
    };

    Ok(BalanceReport {
        debit_total: total(&column_values(&rows, debit_col), debit)?,
        credit_total,
    })
}

fn stock_totals(table: &RawTable, quantity: &str, value: &str) -> Result<(Decimal, Decimal)> {
    let q = require_column(table, quantity)?;
    let v = require_column(table, value)?;
    let rows: Vec<&[Cell]> = table.rows.iter().map(Vec::as_slice).collect();
    Ok((
        total(&column_values(&rows, q), quantity)?,
        total(&column_values(&rows, v), value)?,
    ))
}

/// Stock movement sheets are summed as-is; they carry no subtotal rows.
pub fn stock(
    stock_in: &RawTable,
    stock_out: &RawTable,
    quantity: &str,
    value: &str,
) -> Result<StockReport> {
    let (quantity_in, value_in) = stock_totals(stock_in, quantity, value)?;
    let (quantity_out, value_out) = stock_totals(stock_out, quantity, value)?;
    Ok(StockReport {
        quantity_in,
        quantity_out,
        value_in,
        value_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_table() -> RawTable {
        RawTable::new(
            vec!["Cari hesap adı".to_string(), "Ciro".to_string()],
            vec![
                vec![Cell::text("Demir A.Ş."), Cell::Number(1200.0)],
                vec![Cell::text("Çelik Ltd."), Cell::Number(5400.5)],
                vec![Cell::Empty, Cell::Number(99.0)],
                vec![Cell::text("Genel Toplam"), Cell::Number(6699.5)],
                vec![Cell::text("Kaya Yapı"), Cell::Number(300.0)],
            ],
        )
    }

    #[test]
    fn test_clean_rows_drop_blank_and_totals() {
        let t = sales_table();
        assert_eq!(clean_rows(&t, 0).len(), 3);
    }

    #[test]
    fn test_ranked_sales() {
        let r = ranked(&sales_table(), "cari hesap adı", "CIRO", TOP_N).unwrap();
        assert_eq!(r.total, Decimal::new(69005, 1));
        let names: Vec<_> = r.top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Çelik Ltd.", "Demir A.Ş.", "Kaya Yapı"]);
    }

    #[test]
    fn test_ranked_truncates() {
        let r = ranked(&sales_table(), "Cari hesap adı", "Ciro", 1).unwrap();
        assert_eq!(r.top.len(), 1);
        assert_eq!(r.top[0].value, Decimal::new(54005, 1));
    }

    #[test]
    fn test_missing_column_is_error() {
        let err = ranked(&sales_table(), "Cari hesap adı", "TL Borç", TOP_N).unwrap_err();
        assert!(err.to_string().contains("TL Borç"));
    }

    #[test]
    fn test_balances_optional_credit() {
        let t = RawTable::new(
            vec!["Cari hesap adı".to_string(), "TL Borç Bakiye".to_string()],
            vec![
                vec![Cell::text("A"), Cell::Number(10.0)],
                vec![Cell::text("TOPLAM"), Cell::Number(10.0)],
            ],
        );
        let b = balances(&t, "Cari hesap adı", "TL Borç Bakiye", "TL Alacak Bakiye").unwrap();
        assert_eq!(b.debit_total, Decimal::new(10, 0));
        assert_eq!(b.credit_total, Decimal::ZERO);
    }

    #[test]
    fn test_stock_turkish_dotted_capital() {
        let t = RawTable::new(
            vec!["MİKTAR".to_string(), "NET TUTAR".to_string()],
            vec![
                vec![Cell::Number(3.0), Cell::Number(30.0)],
                vec![Cell::Number(2.0), Cell::text("1.000,00")],
            ],
        );
        let s = stock(&t, &t, "MİKTAR", "NET TUTAR").unwrap();
        assert_eq!(s.quantity_in, Decimal::new(5, 0));
        assert_eq!(s.value_out, Decimal::new(1030, 0));
    }

    #[test]
    fn test_lookup_ignores_turkish_dotted_i() {
        let t = RawTable::new(
            vec!["Miktar".to_string(), "Net Tutar".to_string()],
            vec![vec![Cell::Number(4.0), Cell::Number(8.0)]],
        );
        assert_eq!(find_column(&t, "MİKTAR"), Some(0));
        assert_eq!(find_column(&t, "MIKTAR"), Some(0));
        let s = stock(&t, &t, "MİKTAR", "NET TUTAR").unwrap();
        assert_eq!(s.quantity_out, Decimal::new(4, 0));
    }

    #[test]
    fn test_overflowing_total_is_error() {
        let huge = "79.228.162.514.264.337.593.543.950.335";
        let t = RawTable::new(
            vec!["Cari hesap adı".to_string(), "Ciro".to_string()],
            vec![
                vec![Cell::text("A"), Cell::text(huge)],
                vec![Cell::text("B"), Cell::text(huge)],
            ],
        );
        let err = ranked(&t, "Cari hesap adı", "Ciro", TOP_N).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }
}
