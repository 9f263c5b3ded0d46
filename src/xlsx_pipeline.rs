use contract_table_unifier::{
    Conversion, ExtractionReport, UnifiedTable, UnifyError, UnifyOptions, UnifyOutcome,
    extract_pdf_bytes_to_xlsx, unify_pdf_bytes,
};

use crate::error::ApiError;
use crate::models::{
    NO_TABLES_MESSAGE, PREVIEW_ROW_LIMIT, PreviewResponse, PreviewRow, RunStatus, success_message,
};
use crate::upload::PdfUpload;

/// Unifies the upload's tables without building a workbook.
pub fn unify_upload(upload: &PdfUpload) -> Result<UnifyOutcome, ApiError> {
    let (outcome, report) = unify_pdf_bytes(&upload.bytes, &UnifyOptions::default())
        .map_err(|error| conversion_failed(upload, error))?;

    log_report(&upload.file_name, &report);
    Ok(outcome)
}

pub fn convert_upload(upload: &PdfUpload) -> Result<Conversion, ApiError> {
    let conversion = extract_pdf_bytes_to_xlsx(&upload.bytes, &UnifyOptions::default())
        .map_err(|error| conversion_failed(upload, error))?;

    log_report(&upload.file_name, conversion.report());
    Ok(conversion)
}

fn conversion_failed(upload: &PdfUpload, error: UnifyError) -> ApiError {
    worker::console_error!("conversion failed for '{}': {}", upload.file_name, error);
    ApiError::from(error)
}

fn log_report(file_name: &str, report: &ExtractionReport) {
    worker::console_log!(
        "contract table extraction completed: file={}, rows={}, tables={}, grids={}, warnings={}",
        file_name,
        report.row_count,
        report.table_count,
        report.grid_count,
        report.warnings.len()
    );
}

pub fn preview_rows(table: &UnifiedTable) -> Vec<PreviewRow> {
    table
        .preview(PREVIEW_ROW_LIMIT)
        .iter()
        .map(|row| PreviewRow {
            code: row.code.clone(),
            description: row.description.clone(),
            value: row.value.clone(),
        })
        .collect()
}

pub fn preview_response(outcome: &UnifyOutcome) -> PreviewResponse {
    match outcome {
        UnifyOutcome::NoMatchingTables => PreviewResponse {
            status: RunStatus::Empty,
            message: NO_TABLES_MESSAGE.to_string(),
            row_count: 0,
            table_count: 0,
            columns: Vec::new(),
            preview: Vec::new(),
        },
        UnifyOutcome::Unified(table) => PreviewResponse {
            status: RunStatus::Success,
            message: success_message(table.row_count()),
            row_count: table.row_count(),
            table_count: table.table_count,
            columns: UnifyOptions::default().column_names.to_vec(),
            preview: preview_rows(table),
        },
    }
}
