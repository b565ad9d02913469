//! One loader per file shape. The strategy comes from source
//! configuration; loaders never guess and never fall back to each other.

pub mod html;
pub mod sheet;

use std::path::Path;

use cashflow_core::RawTable;

use crate::config::LoadStrategy;
use crate::error::LoadError;

pub use html::{load_html_table, parse_first_table};
pub use sheet::{load_native_sheet, load_offset_sheet};

pub fn load_table(path: &Path, strategy: &LoadStrategy) -> Result<RawTable, LoadError> {
    match strategy {
        LoadStrategy::HtmlTable => load_html_table(path),
        LoadStrategy::OffsetHeaderSheet { header_row } => load_offset_sheet(path, *header_row),
        LoadStrategy::NativeSheet => load_native_sheet(path),
    }
}
