//! Spreadsheet (xlsx) codeplug format
//!
//! The first worksheet, `Codeplug`, holds one row per model declaration:
//! `Model | <model name> | <frequency range> | ...`. Every other worksheet is
//! named after a record kind; its first row holds field names and each
//! following row is one record. Worksheets appear in order of first use, so
//! records keep their relative order within a kind.
//!
//! A blank cell means the record has no such field. Records of one kind may
//! carry different fields, so a field one record lacks is left blank rather
//! than written as an empty value. An empty value is likewise stored as a
//! blank cell and reads back as an absent field.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format as CellFormat, Workbook, XlsxError};

use super::record::Record;
use super::{Declaration, Format};
use crate::error::{Error, Result};

const HEADER_SHEET: &str = "Codeplug";
const MODEL_CELL: &str = "Model";

/// Zip local file header, the first bytes of every xlsx file
const ZIP_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// Whether `data` looks like an xlsx workbook
pub fn looks_like_xlsx(data: &[u8]) -> bool {
    data.starts_with(ZIP_SIGNATURE)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a spreadsheet codeplug
pub fn parse(data: &[u8]) -> Result<(Vec<Declaration>, Vec<Record>)> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| Error::malformed(Format::Spreadsheet, e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.first().map(String::as_str) != Some(HEADER_SHEET) {
        return Err(Error::malformed(
            Format::Spreadsheet,
            format!("first worksheet must be \"{}\"", HEADER_SHEET),
        ));
    }

    let mut declarations = Vec::new();
    let mut records = Vec::new();

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| Error::malformed(Format::Spreadsheet, format!("{}: {}", name, e)))?;

        if name == HEADER_SHEET {
            for row in range.rows() {
                let cells: Vec<String> = row.iter().map(cell_text).collect();
                match cells.split_first() {
                    Some((key, rest)) if key == MODEL_CELL => {
                        let mut values = rest.iter().filter(|v| !v.is_empty());
                        let Some(model) = values.next() else {
                            return Err(Error::malformed(
                                Format::Spreadsheet,
                                "model row without a model name",
                            ));
                        };
                        declarations.push(Declaration {
                            model: model.clone(),
                            frequency_ranges: values.cloned().collect(),
                        });
                    }
                    _ => continue,
                }
            }
            continue;
        }

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            continue;
        };
        let header: Vec<String> = header.iter().map(cell_text).collect();

        for row in rows {
            if row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            let mut record = Record::new(name.as_str());
            for (field, cell) in header.iter().zip(row.iter()) {
                if !field.is_empty() && !matches!(cell, Data::Empty) {
                    record.push(field.as_str(), cell_text(cell));
                }
            }
            records.push(record);
        }
    }

    Ok((declarations, records))
}

fn xlsx_error(e: XlsxError) -> Error {
    Error::Spreadsheet(e.to_string())
}

/// Render a loaded codeplug as an xlsx workbook
pub fn render(model: &str, frequency_range: &str, records: &[Record]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = CellFormat::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(HEADER_SHEET).map_err(xlsx_error)?;
    sheet
        .write_string_with_format(0, 0, MODEL_CELL, &bold)
        .map_err(xlsx_error)?;
    sheet.write_string(0, 1, model).map_err(xlsx_error)?;
    sheet.write_string(0, 2, frequency_range).map_err(xlsx_error)?;

    // Kinds in order of first appearance
    let mut kinds: Vec<&str> = Vec::new();
    for record in records {
        if !kinds.contains(&record.kind.as_str()) {
            kinds.push(&record.kind);
        }
    }

    for kind in kinds {
        let of_kind: Vec<&Record> = records.iter().filter(|r| r.kind == kind).collect();

        let mut columns: Vec<&str> = Vec::new();
        for record in &of_kind {
            for field in &record.fields {
                if !columns.contains(&field.name.as_str()) {
                    columns.push(&field.name);
                }
            }
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(kind).map_err(xlsx_error)?;
        for (col, name) in columns.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *name, &bold)
                .map_err(xlsx_error)?;
        }
        for (row, record) in of_kind.iter().enumerate() {
            for (col, name) in columns.iter().enumerate() {
                match record.get(name) {
                    Some(value) if !value.is_empty() => {
                        sheet
                            .write_string((row + 1) as u32, col as u16, value)
                            .map_err(xlsx_error)?;
                    }
                    _ => {}
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeplug::record::kinds;

    #[test]
    fn test_render_parses_back() {
        let records = vec![
            Record::new(kinds::GENERAL_SETTINGS).with("Radio Name", "Base"),
            Record::new(kinds::CHANNEL)
                .with("Name", "Simplex")
                .with("Rx Frequency", "446.00000"),
            Record::new(kinds::CHANNEL)
                .with("Name", "Repeater")
                .with("Rx Frequency", "439.50000"),
        ];

        let data = render("MD-380", "400-480 MHz", &records).unwrap();
        assert!(looks_like_xlsx(&data));

        let (declarations, parsed) = parse(&data).unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].model, "MD-380");
        assert_eq!(declarations[0].frequency_ranges, vec!["400-480 MHz"]);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].get("Radio Name"), Some("Base"));
        assert_eq!(parsed[1].get("Name"), Some("Simplex"));
        assert_eq!(parsed[2].get("Rx Frequency"), Some("439.50000"));
    }

    #[test]
    fn test_missing_fields_stay_missing() {
        let records = vec![
            Record::new(kinds::CHANNEL)
                .with("Name", "A")
                .with("Power", "High"),
            Record::new(kinds::CHANNEL).with("Name", "B"),
            Record::new(kinds::CHANNEL)
                .with("Power", "Low")
                .with("Name", "C"),
        ];

        let data = render("MD-380", "400-480 MHz", &records).unwrap();
        let (_, parsed) = parse(&data).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], records[0]);
        assert_eq!(parsed[1], records[1]);
        assert_eq!(parsed[1].get("Power"), None);
        assert_eq!(parsed[2].get("Name"), Some("C"));
        assert_eq!(parsed[2].get("Power"), Some("Low"));
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(!looks_like_xlsx(b"Model: MD-380"));
        assert!(matches!(
            parse(b"PK\x03\x04 not really a zip"),
            Err(Error::Malformed {
                format: Format::Spreadsheet,
                ..
            })
        ));
    }
}
