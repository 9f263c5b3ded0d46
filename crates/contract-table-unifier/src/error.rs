use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnifyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}
