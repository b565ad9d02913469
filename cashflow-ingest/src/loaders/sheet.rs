//! Native spreadsheets (xls/xlsx/ods via calamine) and plain CSV exports.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

use cashflow_core::{Cell, RawTable};

use crate::error::LoadError;

/// Read the first worksheet as absolute rows: leading blank rows and
/// columns the sheet skipped are filled with empty cells so row indices
/// match what a user sees in the spreadsheet.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<Cell>>, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))?
        .map_err(|source| LoadError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(range_rows(&range))
}

fn range_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(data_cell));
        rows.push(cells);
    }
    rows
}

fn data_cell(d: &Data) -> Cell {
    match d {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::text(s.as_str()),
        other => Cell::text(other.to_string()),
    }
}

/// Every record as text cells, no header handling.
pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<Cell>>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(Cell::text).collect());
    }
    Ok(rows)
}

/// Use row `header_row` as labels and keep the rows after it.
///
/// Rows above the header are dropped; they are title/metadata rows.
pub fn split_at_header(
    mut rows: Vec<Vec<Cell>>,
    header_row: usize,
    path: &Path,
) -> Result<RawTable, LoadError> {
    if header_row >= rows.len() {
        return Err(LoadError::HeaderOutOfRange {
            path: path.to_path_buf(),
            row: header_row,
            rows: rows.len(),
        });
    }

    let data = rows.split_off(header_row + 1);
    let labels = rows
        .pop()
        .unwrap_or_default()
        .iter()
        .map(Cell::as_text)
        .collect();

    Ok(RawTable::new(labels, data))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn read_rows(path: &Path) -> Result<Vec<Vec<Cell>>, LoadError> {
    if is_csv(path) {
        read_csv_rows(path)
    } else {
        read_first_sheet(path)
    }
}

/// First row holds the labels.
pub fn load_native_sheet(path: &Path) -> Result<RawTable, LoadError> {
    let rows = read_rows(path)?;
    if rows.is_empty() {
        return Ok(RawTable::default());
    }
    split_at_header(rows, 0, path)
}

/// Labels sit at a fixed, known row.
pub fn load_offset_sheet(path: &Path, header_row: usize) -> Result<RawTable, LoadError> {
    split_at_header(read_rows(path)?, header_row, path)
}
