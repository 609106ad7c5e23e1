//! Spreadsheet upload parsing (CSV, XLS, XLSX).

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use thiserror::Error;

use super::columns::{resolve_headers, row_from_cells};
use super::models::{CellValue, SourceRow};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported spreadsheet format: '{0}' (expected .csv, .xls or .xlsx)")]
    UnsupportedFormat(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read workbook: {0}")]
    Workbook(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Workbook,
}

impl SpreadsheetFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Parse an uploaded spreadsheet into normalized rows. Blank rows are skipped.
pub fn parse_spreadsheet(filename: &str, bytes: &[u8]) -> Result<Vec<SourceRow>, IngestError> {
    let format = SpreadsheetFormat::from_filename(filename)
        .ok_or_else(|| IngestError::UnsupportedFormat(filename.to_string()))?;

    let rows = match format {
        SpreadsheetFormat::Csv => parse_csv(bytes)?,
        SpreadsheetFormat::Workbook => parse_workbook(bytes)?,
    };

    log::info!("Parsed {} rows from '{}'", rows.len(), filename);
    Ok(rows)
}

pub fn parse_csv(bytes: &[u8]) -> Result<Vec<SourceRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = resolve_headers(&headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = row_from_cells(&columns, record.iter().map(CellValue::from));
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SourceRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)?
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| cell_text(cell).0)
        .collect();
    let columns = resolve_headers(&headers);

    Ok(sheet_rows
        .map(|cells| row_from_cells(&columns, cells.iter().map(cell_text)))
        .filter(|row| !row.is_empty())
        .collect())
}

fn cell_text(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::blank(),
        Data::String(text) => CellValue::new(text.clone()),
        Data::Int(value) => CellValue::new(value.to_string()),
        Data::Float(value) => CellValue::from_float(*value),
        Data::Bool(value) => CellValue::new(value.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| CellValue::new(date.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| CellValue::new(cell.to_string())),
        other => CellValue::new(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
TANGGAL,NO,NAMA,BARANG,QTY,DPP,PPN,PPH,TGL SJN,NO. SJN,NO. FAKTUR,NO. PPH,Catatan
2024-01-01,INV-1,ACME,Goods A,2,1000000,110000,1000,2023-12-30,SJ-1,010.1,B-1,x
,,,,,,,,,,,,
2024-01-01,INV-1,ACME,Goods B,1,500000,,,,,,,
";

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            SpreadsheetFormat::from_filename("data.CSV"),
            Some(SpreadsheetFormat::Csv)
        );
        assert_eq!(
            SpreadsheetFormat::from_filename("rekap.xlsx"),
            Some(SpreadsheetFormat::Workbook)
        );
        assert_eq!(SpreadsheetFormat::from_filename("notes.txt"), None);
        assert_eq!(SpreadsheetFormat::from_filename("noext"), None);
    }

    #[test]
    fn test_parse_csv_maps_headers_and_skips_blank_rows() {
        let rows = parse_spreadsheet("rekap.csv", SHEET.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer.as_str(), "ACME");
        assert_eq!(rows[0].sj_no.as_str(), "SJ-1");
        assert_eq!(rows[0].bupot_no.as_str(), "B-1");
        assert_eq!(rows[1].description.as_str(), "Goods B");
        assert!(rows[1].ppn.is_blank());
    }

    #[test]
    fn test_parse_csv_short_rows() {
        let rows = parse_csv(b"NAMA,DPP\nACME\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].dpp.is_blank());
    }

    #[test]
    fn test_unsupported_format() {
        let err = parse_spreadsheet("rekap.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_corrupt_workbook() {
        let err = parse_spreadsheet("rekap.xlsx", b"not a zip").unwrap_err();
        assert!(matches!(err, IngestError::Workbook(_)));
    }

    #[test]
    fn test_cell_text_float() {
        assert_eq!(cell_text(&Data::Float(1000000.0)).as_str(), "1000000");
        assert_eq!(cell_text(&Data::Float(2.5)).as_str(), "2.5");
        assert!(cell_text(&Data::Empty).is_blank());
    }
}
