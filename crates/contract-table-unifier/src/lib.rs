mod csv_out;
mod error;
mod header;
mod model;
mod options;
mod pdf_reader;
mod table_detect;
mod table_parse;
mod text_layout;
mod unify;
mod warning;
mod xlsx_out;

use std::path::Path;

use crate::pdf_reader::{read_pdf_pages, read_pdf_pages_from_bytes};
use crate::table_detect::detect_grids;

pub use error::UnifyError;
pub use header::{GridVerdict, HeaderMatcher};
pub use model::{NormalizedRow, PageText, RawTableGrid, UnifiedTable, UnifyOutcome};
pub use options::{
    DEFAULT_COLUMN_NAMES, DEFAULT_HEADER_TOKEN, DEFAULT_SHEET_NAME, PageSelection, UnifyOptions,
};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLSX_FILE_NAME: &str = "tabelas_unificadas.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub table_count: usize,
    pub grid_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Result of one upload-to-download run. `xlsx` is only produced when at
/// least one matching table was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    NoMatchingTables(ExtractionReport),
    Converted {
        table: UnifiedTable,
        xlsx: Vec<u8>,
        report: ExtractionReport,
    },
}

impl Conversion {
    #[must_use]
    pub fn report(&self) -> &ExtractionReport {
        match self {
            Self::NoMatchingTables(report) | Self::Converted { report, .. } => report,
        }
    }
}

/// Filters grids down to CÓDIGO/DESCRIÇÃO/VALOR tables and merges them.
pub fn unify_grids<I>(
    grids: I,
    options: &UnifyOptions,
) -> Result<(UnifyOutcome, ExtractionReport), UnifyError>
where
    I: IntoIterator<Item = RawTableGrid>,
{
    options.validate()?;
    let matcher = HeaderMatcher::new(&options.header_token)?;

    let grids = grids.into_iter().collect::<Vec<_>>();
    let grid_count = grids.len();
    let mut warnings = Vec::new();
    let outcome = unify::unify(grids, &matcher, &mut warnings);

    let (row_count, table_count) = outcome
        .table()
        .map_or((0, 0), |table| (table.row_count(), table.table_count));
    Ok((
        outcome,
        ExtractionReport {
            row_count,
            table_count,
            grid_count,
            warnings,
        },
    ))
}

pub fn unify_pages(
    pages: &[PageText],
    options: &UnifyOptions,
) -> Result<(UnifyOutcome, ExtractionReport), UnifyError> {
    unify_grids(detect_grids(pages, options.min_cols), options)
}

pub fn unify_pdf_bytes(
    input_pdf: &[u8],
    options: &UnifyOptions,
) -> Result<(UnifyOutcome, ExtractionReport), UnifyError> {
    options.validate()?;
    let pages = read_pdf_pages_from_bytes(input_pdf, options.pages.as_ref())?;
    unify_pages(&pages, options)
}

pub fn unify_pdf(
    input_pdf: &Path,
    options: &UnifyOptions,
) -> Result<(UnifyOutcome, ExtractionReport), UnifyError> {
    options.validate()?;
    let pages = read_pdf_pages(input_pdf, options.pages.as_ref())?;
    unify_pages(&pages, options)
}

pub fn table_to_xlsx(table: &UnifiedTable, options: &UnifyOptions) -> Result<Vec<u8>, UnifyError> {
    xlsx_out::write_xlsx_to_buffer(table, options)
}

pub fn table_to_csv(table: &UnifiedTable, options: &UnifyOptions) -> Result<String, UnifyError> {
    csv_out::write_csv_to_string(table, options)
}

/// Full in-memory run: PDF bytes in, spreadsheet bytes out.
pub fn extract_pdf_bytes_to_xlsx(
    input_pdf: &[u8],
    options: &UnifyOptions,
) -> Result<Conversion, UnifyError> {
    let (outcome, report) = unify_pdf_bytes(input_pdf, options)?;
    match outcome {
        UnifyOutcome::NoMatchingTables => Ok(Conversion::NoMatchingTables(report)),
        UnifyOutcome::Unified(table) => {
            let xlsx = table_to_xlsx(&table, options)?;
            Ok(Conversion::Converted {
                table,
                xlsx,
                report,
            })
        }
    }
}

/// Writes the unified table to `output`, as CSV when `csv` is set. Nothing
/// is written when no matching table is found.
pub fn extract_pdf_to_file(
    input_pdf: &Path,
    output: &Path,
    csv: bool,
    options: &UnifyOptions,
) -> Result<ExtractionReport, UnifyError> {
    let (outcome, report) = unify_pdf(input_pdf, options)?;
    if let Some(table) = outcome.table() {
        if csv {
            std::fs::write(output, table_to_csv(table, options)?)?;
        } else {
            xlsx_out::write_xlsx(output, table, options)?;
        }
    }
    Ok(report)
}
