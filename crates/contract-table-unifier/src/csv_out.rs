use csv::WriterBuilder;

use crate::error::UnifyError;
use crate::model::UnifiedTable;
use crate::options::UnifyOptions;

pub(crate) fn write_csv_to_string(
    table: &UnifiedTable,
    options: &UnifyOptions,
) -> Result<String, UnifyError> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(&options.column_names)?;
    for row in &table.rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| UnifyError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| UnifyError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
