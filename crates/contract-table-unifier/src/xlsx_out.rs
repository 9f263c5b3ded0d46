use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::UnifyError;
use crate::model::UnifiedTable;
use crate::options::UnifyOptions;

const COLUMN_WIDTHS: [f64; 3] = [14.0, 60.0, 16.0];

fn build_workbook(table: &UnifiedTable, options: &UnifyOptions) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&options.sheet_name)?;

    for ((col, name), width) in (0_u16..).zip(&options.column_names).zip(COLUMN_WIDTHS) {
        worksheet.write_string_with_format(0, col, name, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, field) in (0_u16..).zip(row.fields()) {
            worksheet.write_string(row_number, col, field)?;
        }
    }

    Ok(workbook)
}

pub(crate) fn write_xlsx_to_buffer(
    table: &UnifiedTable,
    options: &UnifyOptions,
) -> Result<Vec<u8>, UnifyError> {
    let mut workbook = build_workbook(table, options)?;
    Ok(workbook.save_to_buffer()?)
}

pub(crate) fn write_xlsx(
    path: &Path,
    table: &UnifiedTable,
    options: &UnifyOptions,
) -> Result<(), UnifyError> {
    let buffer = write_xlsx_to_buffer(table, options)?;
    std::fs::write(path, buffer)?;
    Ok(())
}
