use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::entities::dataset::{infer_columns, Row, Value};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "petition_results.csv";

fn export_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Writes every row with a header of the raw column keys. All fields are
/// quoted. Returns the number of data rows written; nothing is written for
/// an empty dataset.
pub fn write_rows_csv<W: Write>(rows: &[Row], writer: W) -> Result<usize> {
    let columns = infer_columns(rows);
    if columns.is_empty() {
        return Ok(0);
    }

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(columns.iter().map(|column| column.key.as_str()))
        .context("failed to write csv header")?;

    for row in rows {
        csv_writer
            .write_record(
                columns
                    .iter()
                    .map(|column| export_field(row.get(&column.key))),
            )
            .context("failed to write csv row")?;
    }

    csv_writer.flush().context("failed to flush csv output")?;
    Ok(rows.len())
}

pub fn export_rows_to_path(rows: &[Row], path: &Path) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("failed to create export file: {}", path.display()))?;
    write_rows_csv(rows, file)
        .with_context(|| format!("failed to export csv: {}", path.display()))
}
