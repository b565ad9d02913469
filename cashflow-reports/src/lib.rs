//! cashflow-reports: accounting report summaries and the markdown
//! financial report that embeds the cash-flow overview.

pub mod accounting;
pub mod markdown;

pub use accounting::{BalanceReport, RankedEntry, RankedReport, StockReport, TOP_N};
pub use markdown::render_report;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use cashflow_core::RawTable;
use cashflow_ingest::loaders::load_native_sheet;

/// File names of the accounting exports, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFiles {
    pub sales: String,
    pub purchases: String,
    pub expenses: String,
    pub balances: String,
    pub stock_in: String,
    pub stock_out: String,
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self {
            sales: "Aylık cari satış raporu.xls".to_string(),
            purchases: "Aylık ciro alış raporu.xls".to_string(),
            expenses: "Masraf durum raporu.xls".to_string(),
            balances: "Cari bakiye durum raporu.xls".to_string(),
            stock_in: "Genel alış stok hareket föyü.xlsx".to_string(),
            // The export really has two spaces here.
            stock_out: "Genel  satış stok hareket föyü.xlsx".to_string(),
        }
    }
}

/// Whatever could be summarized; a `None` section is left out of the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountingReports {
    pub sales: Option<RankedReport>,
    pub purchases: Option<RankedReport>,
    pub expenses: Option<RankedReport>,
    pub balances: Option<BalanceReport>,
    pub stock: Option<StockReport>,
}

const CUSTOMER: &str = "Cari hesap adı";
const TURNOVER: &str = "Ciro";
const ACCOUNT: &str = "Hesap adı";
const DEBIT_TL: &str = "TL Borç";
const DEBIT_BALANCE: &str = "TL Borç Bakiye";
const CREDIT_BALANCE: &str = "TL Alacak Bakiye";
const QUANTITY: &str = "MİKTAR";
const NET_AMOUNT: &str = "NET TUTAR";

fn load(data_dir: &Path, file: &str) -> Result<RawTable> {
    let path = data_dir.join(file);
    load_native_sheet(&path).with_context(|| format!("loading {file}"))
}

/// Log and drop a failed section.
fn section<T>(label: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Error loading {label}: {e:#}");
            None
        }
    }
}

pub fn load_reports(data_dir: &Path, files: &ReportFiles) -> AccountingReports {
    log::info!("Loading report data from {}", data_dir.display());

    let sales = section(
        "Sales",
        load(data_dir, &files.sales)
            .and_then(|t| accounting::ranked(&t, CUSTOMER, TURNOVER, TOP_N)),
    );
    let purchases = section(
        "Purchases",
        load(data_dir, &files.purchases)
            .and_then(|t| accounting::ranked(&t, CUSTOMER, TURNOVER, TOP_N)),
    );
    let expenses = section(
        "Expenses",
        load(data_dir, &files.expenses)
            .and_then(|t| accounting::ranked(&t, ACCOUNT, DEBIT_TL, TOP_N)),
    );
    let balances = section(
        "Balances",
        load(data_dir, &files.balances).and_then(|t| {
            accounting::balances(&t, CUSTOMER, DEBIT_BALANCE, CREDIT_BALANCE)
        }),
    );
    let stock = section(
        "Stock",
        load(data_dir, &files.stock_in)
            .and_then(|i| Ok((i, load(data_dir, &files.stock_out)?)))
            .and_then(|(i, o)| accounting::stock(&i, &o, QUANTITY, NET_AMOUNT)),
    );

    AccountingReports {
        sales,
        purchases,
        expenses,
        balances,
        stock,
    }
}
