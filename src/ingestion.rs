//! Reading tabular sources into a [`RawFrame`].
//!
//! The upload mechanism is the caller's concern; this module only turns the
//! bytes into rows and columns. Numeric cells accept both plain ("1234.56")
//! and Brazilian ("1.234,56") decimal conventions. Failures here are fatal
//! per the error taxonomy: nothing downstream runs on an unreadable source.

use crate::brl;
use crate::error::{FiscalPipelineError, Result};
use crate::frame::{Cell, RawFrame};
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::debug;
use std::path::Path;

/// Reads a comma-delimited CSV file.
pub fn read_csv(path: &Path) -> Result<RawFrame> {
    read_csv_with_delimiter(path, b',')
}

/// Reads a CSV file with an explicit delimiter (Brazilian exports commonly
/// use `;`).
pub fn read_csv_with_delimiter(path: &Path, delimiter: u8) -> Result<RawFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<Cell> = record.iter().map(parse_cell).collect();
        if cells.iter().all(|cell| *cell == Cell::Empty) {
            continue;
        }
        rows.push(cells);
    }

    debug!("Read {} data row(s) from {}", rows.len(), path.display());
    RawFrame::from_rows(headers, rows)
}

/// Reads the first worksheet of an XLSX workbook; the first row is taken as
/// the header row.
pub fn read_xlsx(path: &Path) -> Result<RawFrame> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| {
            FiscalPipelineError::UnreadableSource(format!(
                "no worksheets found in {}",
                path.display()
            ))
        })?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut row_iter = range.rows();

    let headers: Vec<String> = row_iter
        .next()
        .ok_or_else(|| {
            FiscalPipelineError::UnreadableSource(format!(
                "worksheet '{}' is empty in {}",
                sheet_name, path.display()
            ))
        })?
        .iter()
        .map(data_to_text)
        .collect();

    let mut rows = Vec::new();
    for row in row_iter {
        let cells: Vec<Cell> = row.iter().map(data_to_cell).collect();
        if cells.iter().all(|cell| *cell == Cell::Empty) {
            continue;
        }
        rows.push(cells);
    }

    debug!(
        "Read {} data row(s) from sheet '{}' of {}",
        rows.len(),
        sheet_name,
        path.display()
    );
    RawFrame::from_rows(headers, rows)
}

/// Classifies one text field. Empty stays empty; anything that parses as a
/// plain or Brazilian decimal becomes a number; the rest is text.
pub fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Cell::Number(value);
        }
    }
    if let Some(value) = brl::parse_decimal(trimmed) {
        return Cell::Number(value);
    }
    Cell::Text(trimmed.to_string())
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::String(text) => parse_cell(text),
        Data::Bool(value) => Cell::Text(value.to_string()),
        // Real date cells in the label column resolve through the YYYY-MM
        // rule after this rendering.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::Text(naive.format("%Y-%m").to_string()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::Error(err) => Cell::Text(format!("{:?}", err)),
    }
}

fn data_to_text(data: &Data) -> String {
    match data {
        Data::String(text) => text.clone(),
        other => data_to_cell(other).display_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ColumnKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_cell_variants() {
        assert_eq!(parse_cell(""), Cell::Empty);
        assert_eq!(parse_cell("  "), Cell::Empty);
        assert_eq!(parse_cell("100.5"), Cell::Number(100.5));
        assert_eq!(parse_cell("1.234,56"), Cell::Number(1234.56));
        assert_eq!(parse_cell("2023-01"), Cell::Text("2023-01".into()));
        assert_eq!(parse_cell("n/d"), Cell::Text("n/d".into()));
    }

    #[test]
    fn test_read_csv_happy_path() {
        let file = write_csv(
            "MÊS,VENDAS,COMPRAS\n\
             2023-01,100.5,\"1.234,56\"\n\
             2023-02,200,\n\
             ,,\n",
        );
        let frame = read_csv(file.path()).unwrap();

        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.rows[0].label, "2023-01");
        assert_eq!(
            frame.rows[0].cells,
            vec![Cell::Number(100.5), Cell::Number(1234.56)]
        );
        assert_eq!(frame.rows[1].cells, vec![Cell::Number(200.0), Cell::Empty]);
        assert!(frame
            .columns
            .iter()
            .all(|column| column.kind == ColumnKind::Numeric));
    }

    #[test]
    fn test_read_csv_semicolon_delimiter() {
        let file = write_csv("MÊS;VENDAS\n2023-01;1.234,56\n");
        let frame = read_csv_with_delimiter(file.path(), b';').unwrap();

        assert_eq!(frame.rows[0].cells, vec![Cell::Number(1234.56)]);
    }

    #[test]
    fn test_read_csv_missing_label_column() {
        let file = write_csv("MES,VENDAS\n2023-01,100\n");
        let result = read_csv(file.path());

        assert!(matches!(
            result,
            Err(FiscalPipelineError::MissingRequiredColumn(_))
        ));
    }

    #[test]
    fn test_read_csv_malformed_metric_cell_passes_through() {
        let file = write_csv("MÊS,VENDAS\n2023-01,aguardando\n");
        let frame = read_csv(file.path()).unwrap();

        assert_eq!(frame.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(frame.rows[0].cells, vec![Cell::Text("aguardando".into())]);
    }

    #[test]
    fn test_read_xlsx_rejects_non_workbook() {
        let file = write_csv("not a workbook at all");
        let result = read_xlsx(file.path());

        assert!(matches!(
            result,
            Err(FiscalPipelineError::Spreadsheet(_))
        ));
    }
}
