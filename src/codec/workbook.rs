//! The default workbook codec: `calamine` reads, `rust_xlsxwriter` writes.

use super::WorkbookCodec;
use crate::error::ConvertError;
use crate::routines::tabular::Table;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::io::Cursor;
use tracing::debug;

/// Crate-backed [`WorkbookCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWorkbookCodec;

impl WorkbookCodec for XlsxWorkbookCodec {
    fn read_first_sheet(&self, bytes: &[u8]) -> Result<Table, ConvertError> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook =
            open_workbook_auto_from_rs(cursor).map_err(|e| ConvertError::DecodeFailure {
                what: "workbook",
                detail: e.to_string(),
            })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConvertError::DecodeFailure {
                what: "workbook",
                detail: "workbook contains no sheets".into(),
            })?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ConvertError::DecodeFailure {
                what: "workbook",
                detail: e.to_string(),
            })?;
        debug!(
            "Read sheet '{}': {} rows x {} cols",
            sheet_name,
            range.height(),
            range.width()
        );

        let mut rows = range.rows();
        let header = rows.next().ok_or_else(|| ConvertError::DecodeFailure {
            what: "workbook",
            detail: format!("sheet '{sheet_name}' is empty"),
        })?;
        let columns: Vec<String> = header.iter().map(header_text).collect();
        let data_rows: Vec<Vec<Value>> = rows
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        Ok(Table::new(columns, data_rows))
    }

    fn write_workbook(&self, table: &Table) -> Result<Vec<u8>, ConvertError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Data").map_err(encode_failure)?;

        for (col, name) in table.columns.iter().enumerate() {
            sheet
                .write_string(0, col as u16, name)
                .map_err(encode_failure)?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            let row_index = (r + 1) as u32;
            for (c, value) in row.iter().enumerate() {
                let col_index = c as u16;
                match value {
                    Value::Null => {}
                    Value::Bool(b) => {
                        sheet
                            .write_boolean(row_index, col_index, *b)
                            .map_err(encode_failure)?;
                    }
                    Value::Number(n) => {
                        if let Some(f) = n.as_f64() {
                            sheet
                                .write_number(row_index, col_index, f)
                                .map_err(encode_failure)?;
                        }
                    }
                    Value::String(s) => {
                        sheet
                            .write_string(row_index, col_index, s)
                            .map_err(encode_failure)?;
                    }
                    other => {
                        sheet
                            .write_string(row_index, col_index, other.to_string())
                            .map_err(encode_failure)?;
                    }
                }
            }
        }
        workbook.save_to_buffer().map_err(encode_failure)
    }
}

fn encode_failure(e: rust_xlsxwriter::XlsxError) -> ConvertError {
    ConvertError::EncodeFailure {
        what: "workbook",
        detail: e.to_string(),
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Data::Bool(b) => Value::Bool(*b),
        // Dates, durations, and cell errors keep their display rendering.
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_then_read_round_trips_rows() {
        let table = Table::new(
            vec!["name".into(), "count".into(), "ok".into()],
            vec![
                vec![json!("widget"), json!(3.0), json!(true)],
                vec![json!("gadget"), Value::Null, json!(false)],
            ],
        );
        let bytes = XlsxWorkbookCodec.write_workbook(&table).unwrap();
        // XLSX is a ZIP container.
        assert_eq!(&bytes[..2], b"PK");

        let back = XlsxWorkbookCodec.read_first_sheet(&bytes).unwrap();
        assert_eq!(back.columns, table.columns);
        assert_eq!(back.rows.len(), 2);
        assert_eq!(back.rows[0][0], json!("widget"));
        assert_eq!(back.rows[0][1], json!(3.0));
        assert_eq!(back.rows[0][2], json!(true));
        assert_eq!(back.rows[1][1], Value::Null);
    }

    #[test]
    fn garbage_is_a_decode_failure() {
        let err = XlsxWorkbookCodec
            .read_first_sheet(b"definitely not a workbook")
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::DecodeFailure { what: "workbook", .. }
        ));
    }
}
