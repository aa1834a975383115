use crate::projection::TabularRow;
use crate::Result;
use std::fs::File;
use std::io;
use std::path::Path;

/// Write `rows` as CSV to `path`, replacing any existing file.
///
/// The header always comes from [`TabularRow::COLUMNS`], so an empty run still
/// produces a file with a header line. Missing values are written as empty
/// cells.
pub fn write_csv<R: TabularRow>(path: &Path, rows: &[R]) -> Result<()> {
    let file = File::create(path)?;
    write_csv_to(file, rows)?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write `rows` as CSV to any writer.
pub fn write_csv_to<W: io::Write, R: TabularRow>(writer: W, rows: &[R]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(R::COLUMNS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the first `limit` rows as an aligned text table with a 0-based
/// row index column.
pub fn preview<R: TabularRow>(rows: &[R], limit: usize) -> Result<String> {
    if rows.is_empty() {
        return Ok(format!(
            "Empty table (columns: {})",
            R::COLUMNS.join(", ")
        ));
    }

    let mut buffer = Vec::new();
    write_csv_to(&mut buffer, &rows[..limit.min(rows.len())])?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(buffer.as_slice());

    let mut table: Vec<Vec<String>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // first record is the header
        let label = if index == 0 {
            String::new()
        } else {
            (index - 1).to_string()
        };
        table.push(
            std::iter::once(label)
                .chain(record.iter().map(str::to_string))
                .collect(),
        );
    }

    let column_count = table.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..column_count)
        .map(|column| {
            table
                .iter()
                .map(|line| line.get(column).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let lines: Vec<String> = table
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect();

    Ok(lines.join("\n"))
}
