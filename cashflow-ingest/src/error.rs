use std::path::PathBuf;

/// Why a single file could not be turned into a table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no <table> element in {}", .0.display())]
    NoTable(PathBuf),

    #[error("opening workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {} has no worksheets", .0.display())]
    NoWorksheet(PathBuf),

    #[error("reading csv {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("header row {row} is past the end of {} ({rows} rows)", .path.display())]
    HeaderOutOfRange {
        path: PathBuf,
        row: usize,
        rows: usize,
    },

    #[error("bad file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
