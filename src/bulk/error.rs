use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BulkError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read input: {source}")]
    Read {
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("malformed XLSX: {source}")]
    Xlsx {
        #[from]
        source: calamine::XlsxError,
    },
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("unsupported format '{extension}', use .csv, .xlsx or .txt")]
    UnsupportedFormat { extension: String },
    #[error("input contains no addresses")]
    Empty,
}
