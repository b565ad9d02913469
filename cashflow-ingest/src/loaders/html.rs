//! Statements exported as HTML but saved with a spreadsheet extension.
//!
//! Only the first `<table>` matters. A leading row made entirely of `<th>`
//! cells becomes the column labels; everything else is data. Cell text is
//! kept as text so the locale parser sees the original formatting.
//!
//! Bytes are decoded with the charset the document declares (BOM, then
//! `<meta charset>`). Undeclared non-UTF-8 input is read as windows-1254,
//! the usual Turkish export encoding.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1254};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::sync::OnceLock;

use cashflow_core::{Cell, RawTable};

use crate::error::LoadError;

fn table_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("table").expect("invalid table selector"))
}

fn tr_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("tr").expect("invalid tr selector"))
}

pub fn load_html_table(path: &Path) -> Result<RawTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let html = decode_html(&bytes);
    parse_first_table(&html).ok_or_else(|| LoadError::NoTable(path.to_path_buf()))
}

/// Bytes scanned for a `charset=` declaration.
const SNIFF_LEN: usize = 1024;

pub fn decode_html(bytes: &[u8]) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(enc, _)| enc)
        .or_else(|| declared_charset(bytes))
        .filter(|enc| *enc != UTF_8 || std::str::from_utf8(bytes).is_ok())
        .unwrap_or_else(|| {
            if std::str::from_utf8(bytes).is_ok() {
                UTF_8
            } else {
                WINDOWS_1254
            }
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("{} decode replaced malformed bytes", used.name());
    }
    text.into_owned()
}

/// Label from the first `charset=` in the document head, if it names a
/// known encoding.
fn declared_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let lower = head.to_ascii_lowercase();
    let start = lower.windows(8).position(|w| w == b"charset=")? + 8;

    let label: Vec<u8> = lower[start..]
        .iter()
        .copied()
        .skip_while(|b| *b == b'"' || *b == b'\'' || b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
        .collect();
    Encoding::for_label(&label)
}

/// `None` when the document has no table.
pub fn parse_first_table(html: &str) -> Option<RawTable> {
    let doc = Html::parse_document(html);
    let table = doc.select(table_selector()).next()?;

    let mut labels = Vec::new();
    let mut rows = Vec::new();

    for (i, tr) in table.select(tr_selector()).enumerate() {
        let cells: Vec<ElementRef> = tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| {
                let name = c.value().name();
                name.eq_ignore_ascii_case("td") || name.eq_ignore_ascii_case("th")
            })
            .collect();
        if cells.is_empty() {
            continue;
        }

        let all_th = cells
            .iter()
            .all(|c| c.value().name().eq_ignore_ascii_case("th"));
        if i == 0 && all_th {
            labels = cells.iter().map(|c| cell_text(c)).collect();
            continue;
        }

        rows.push(cells.iter().map(|c| Cell::text(cell_text(c))).collect());
    }

    Some(RawTable::new(labels, rows))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
