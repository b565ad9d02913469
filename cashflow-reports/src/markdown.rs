//! Markdown rendering of the full financial report.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use cashflow_core::{format_amount, format_grouped, CashFlowSummary};

use crate::accounting::RankedReport;
use crate::AccountingReports;

const CURRENCY: &str = "TL";

fn money(v: Decimal) -> String {
    format!("{} {CURRENCY}", format_amount(v))
}

fn ranked_section(
    lines: &mut Vec<String>,
    heading: &str,
    total_label: &str,
    top_label: &str,
    report: &RankedReport,
) {
    lines.push(format!("\n{heading}"));
    lines.push(format!("- **{total_label}**: {}", money(report.total)));
    lines.push(format!("- **{top_label}**:"));
    for e in &report.top {
        lines.push(format!("  - {}: {}", e.name, format_amount(e.value)));
    }
}

pub fn render_report(date: NaiveDate, cash_flow: &CashFlowSummary, reports: &AccountingReports) -> String {
    let mut lines = vec![
        "# Financial Analysis Report".to_string(),
        format!("Date: {}", date.format("%Y-%m-%d")),
        "\n## 1. Cash Flow Overview".to_string(),
        cash_flow.render(),
    ];

    if let Some(r) = &reports.sales {
        ranked_section(&mut lines, "## 2. Sales Performance", "Total Sales (Ciro)", "Top 5 Customers", r);
    }
    if let Some(r) = &reports.purchases {
        ranked_section(&mut lines, "## 3. Purchase Analysis", "Total Purchases", "Top 5 Suppliers", r);
    }
    if let Some(r) = &reports.expenses {
        ranked_section(&mut lines, "## 4. Expense Analysis", "Total Expenses", "Top Expenses", r);
    }

    if let Some(b) = &reports.balances {
        lines.push("\n## 5. Account Balances".to_string());
        lines.push(format!(
            "- **Total Debit Balance (Borç Bakiye)**: {}",
            money(b.debit_total)
        ));
        if b.credit_total > Decimal::ZERO {
            lines.push(format!(
                "- **Total Credit Balance (Alacak Bakiye)**: {}",
                money(b.credit_total)
            ));
        }
    }

    if let Some(s) = &reports.stock {
        lines.push("\n## 6. Stock Analysis".to_string());
        lines.push(format!("- **Total Items In**: {}", format_grouped(s.quantity_in, 0)));
        lines.push(format!("- **Total Items Out**: {}", format_grouped(s.quantity_out, 0)));
        lines.push(format!("- **Total Value In**: {}", money(s.value_in)));
        lines.push(format!("- **Total Value Out**: {}", money(s.value_out)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::{BalanceReport, RankedEntry, StockReport};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_cash_flow_only() {
        let text = render_report(
            date(),
            &CashFlowSummary::from_results(vec![]),
            &AccountingReports::default(),
        );
        assert!(text.starts_with("# Financial Analysis Report\nDate: 2026-03-01\n\n## 1. Cash Flow Overview\n"));
        assert!(text.ends_with("**Total Outflow**: 0.00"));
        assert!(!text.contains("## 2."));
    }

    #[test]
    fn test_all_sections() {
        let reports = AccountingReports {
            sales: Some(RankedReport {
                total: Decimal::new(125000, 2),
                top: vec![RankedEntry {
                    name: "Demir".to_string(),
                    value: Decimal::new(100000, 2),
                }],
            }),
            purchases: None,
            expenses: None,
            balances: Some(BalanceReport {
                debit_total: Decimal::new(500, 0),
                credit_total: Decimal::ZERO,
            }),
            stock: Some(StockReport {
                quantity_in: Decimal::new(12345, 0),
                quantity_out: Decimal::new(10, 0),
                value_in: Decimal::new(99, 1),
                value_out: Decimal::ZERO,
            }),
        };

        let text = render_report(date(), &CashFlowSummary::from_results(vec![]), &reports);
        assert!(text.contains("\n## 2. Sales Performance\n- **Total Sales (Ciro)**: 1,250.00 TL\n- **Top 5 Customers**:\n  - Demir: 1,000.00"));
        assert!(text.contains("- **Total Debit Balance (Borç Bakiye)**: 500.00 TL"));
        assert!(!text.contains("Alacak Bakiye"));
        assert!(text.contains("- **Total Items In**: 12,345"));
        assert!(text.contains("- **Total Value In**: 9.90 TL"));
    }
}
