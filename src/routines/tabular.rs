//! Tabular conversions: CSV, JSON row objects, workbooks, and pipe tables.
//!
//! Everything funnels through one in-memory [`Table`]: a header row plus
//! data rows of JSON values. CSV parsing uses the hand-written tokenizer in
//! [`parse_csv`] rather than splitting on commas; quoted fields may contain
//! commas, newlines, and doubled-quote escapes, and a naive split corrupts
//! all three.
//!
//! Cell typing is deliberately asymmetric: CSV-sourced cells stay strings
//! (no numeric inference), while workbook cells keep the types the sheet
//! stored. JSON output therefore round-trips CSV text losslessly.

use crate::codec::WorkbookCodec;
use crate::error::ConvertError;
use serde_json::{Map, Value};

/// A header row plus data rows. The shared shape of every tabular routine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, in sheet/file order.
    pub columns: Vec<String>,
    /// Data rows. Each row has exactly `columns.len()` cells; absent cells
    /// are `Value::Null`.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// True when there are no data rows (a header alone is still empty).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse CSV text. The first record is the header; short rows are
    /// padded with `Null`, cells beyond the header are dropped.
    pub fn from_csv(text: &str) -> Result<Self, ConvertError> {
        let mut records = parse_csv(text)?;
        if records.is_empty() {
            return Ok(Table::default());
        }
        let columns = records.remove(0);
        let rows = records
            .into_iter()
            .map(|record| {
                (0..columns.len())
                    .map(|i| match record.get(i) {
                        Some(cell) => Value::String(cell.clone()),
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();
        Ok(Table::new(columns, rows))
    }

    /// Build a table from row objects. Columns are the union of all keys in
    /// first-appearance order; a key missing from a row becomes `Null`.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// One JSON object per data row, keyed by column name. Null cells are
    /// kept so every record carries the full header.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Serialise as CSV, quoting any cell that needs it.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_row(&mut out, self.columns.iter().map(String::as_str));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            push_csv_row(&mut out, cells.iter().map(String::as_str));
        }
        out
    }

    /// Render as a GFM pipe table. A table with no data rows renders as an
    /// empty string, not a dangling header.
    pub fn to_markdown(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        out.push_str("| ");
        out.push_str(&self.columns.join(" | "));
        out.push_str(" |\n|");
        out.push_str(
            &self
                .columns
                .iter()
                .map(|_| "---")
                .collect::<Vec<_>>()
                .join("|"),
        );
        out.push_str("|\n");
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            out.push_str("| ");
            out.push_str(&cells.join(" | "));
            out.push_str(" |\n");
        }
        out
    }
}

/// Tokenise CSV text into records of string fields.
///
/// Handles quoted fields, doubled-quote escapes (`""` → `"`), and commas,
/// LFs, and CRLFs embedded inside quotes. Completely blank lines are
/// skipped. An unterminated quote at end of input is a
/// [`ConvertError::DecodeFailure`]; everything else parses.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, ConvertError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_was_quoted = false;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    fn end_record(
        records: &mut Vec<Vec<String>>,
        record: &mut Vec<String>,
        field: &mut String,
        field_was_quoted: &mut bool,
    ) {
        record.push(std::mem::take(field));
        *field_was_quoted = false;
        // A record holding a single empty unquoted field is a blank line.
        if record.len() == 1 && record[0].is_empty() {
            record.clear();
        } else {
            records.push(std::mem::take(record));
        }
    }

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() && !field_was_quoted => {
                in_quotes = true;
                field_was_quoted = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_was_quoted = false;
            }
            // CRLF: consume the CR and let the LF close the record.
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                // Quoted empty fields ("") count as content, blank lines don't.
                if field_was_quoted && field.is_empty() && record.is_empty() {
                    record.push(String::new());
                    field_was_quoted = false;
                    records.push(std::mem::take(&mut record));
                } else {
                    end_record(&mut records, &mut record, &mut field, &mut field_was_quoted);
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ConvertError::DecodeFailure {
            what: "csv",
            detail: "unterminated quoted field at end of input".into(),
        });
    }
    // Final record when the input does not end with a newline. A quoted
    // empty field still counts as a record; a bare empty tail does not.
    if !field.is_empty() || field_was_quoted || !record.is_empty() {
        let lone_quoted_empty = field_was_quoted && field.is_empty() && record.is_empty();
        record.push(field);
        if lone_quoted_empty || !(record.len() == 1 && record[0].is_empty()) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn push_csv_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        }
        first = false;
        if cell.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Cell display text: strings verbatim, nulls blank, everything else via
/// its JSON rendering.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse JSON bytes into row objects: an array of objects, or one object
/// treated as a single row.
pub fn records_from_json(bytes: &[u8]) -> Result<Vec<Map<String, Value>>, ConvertError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ConvertError::DecodeFailure {
        what: "json",
        detail: e.to_string(),
    })?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(ConvertError::DecodeFailure {
                    what: "json",
                    detail: format!("expected an array of objects, found {other}"),
                }),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(ConvertError::DecodeFailure {
            what: "json",
            detail: format!("expected an object or array of objects, found {other}"),
        }),
    }
}

fn records_to_json_pretty(records: &[Map<String, Value>]) -> Result<Vec<u8>, ConvertError> {
    serde_json::to_vec_pretty(records)
        .map_err(|e| ConvertError::Internal(format!("json serialisation: {e}")))
}

// ── Router entry points ──────────────────────────────────────────────────

/// First worksheet → JSON array of row objects.
pub fn sheet_to_json(bytes: &[u8], workbook: &dyn WorkbookCodec) -> Result<Vec<u8>, ConvertError> {
    let table = workbook.read_first_sheet(bytes)?;
    records_to_json_pretty(&table.to_records())
}

/// First worksheet → CSV.
pub fn sheet_to_csv(bytes: &[u8], workbook: &dyn WorkbookCodec) -> Result<Vec<u8>, ConvertError> {
    Ok(workbook.read_first_sheet(bytes)?.to_csv().into_bytes())
}

/// JSON row objects → CSV.
pub fn json_to_csv(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let records = records_from_json(bytes)?;
    Ok(Table::from_records(&records).to_csv().into_bytes())
}

/// JSON row objects → XLSX workbook.
pub fn json_to_workbook(
    bytes: &[u8],
    workbook: &dyn WorkbookCodec,
) -> Result<Vec<u8>, ConvertError> {
    let records = records_from_json(bytes)?;
    workbook.write_workbook(&Table::from_records(&records))
}

/// CSV → JSON array of row objects. Zero data rows yield `[]`.
pub fn csv_to_json(text: &str) -> Result<Vec<u8>, ConvertError> {
    let table = Table::from_csv(text)?;
    records_to_json_pretty(&table.to_records())
}

/// CSV → XLSX workbook.
pub fn csv_to_workbook(text: &str, workbook: &dyn WorkbookCodec) -> Result<Vec<u8>, ConvertError> {
    workbook.write_workbook(&Table::from_csv(text)?)
}

/// CSV → GFM pipe table. Zero data rows yield an empty output.
pub fn csv_to_markdown(text: &str) -> Result<Vec<u8>, ConvertError> {
    Ok(Table::from_csv(text)?.to_markdown().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokenizer_handles_quoted_commas_and_escapes() {
        let records = parse_csv("name,note\n\"Jane\",\"hi, there\"\n").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["name".to_string(), "note".to_string()],
                vec!["Jane".to_string(), "hi, there".to_string()],
            ]
        );

        let records = parse_csv("a\n\"she said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(records[1], vec!["she said \"hi\"".to_string()]);
    }

    #[test]
    fn tokenizer_handles_embedded_newlines_and_crlf() {
        let records = parse_csv("a,b\r\n\"line1\nline2\",x\r\n").unwrap();
        assert_eq!(records[1][0], "line1\nline2");
        assert_eq!(records[1][1], "x");
    }

    #[test]
    fn tokenizer_skips_blank_lines() {
        let records = parse_csv("a,b\n\n1,2\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn tokenizer_rejects_unterminated_quotes() {
        let err = parse_csv("a\n\"unclosed\n").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { what: "csv", .. }));
    }

    #[test]
    fn short_rows_pad_with_null() {
        let table = Table::from_csv("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows[0][2], Value::Null);
        let records = table.to_records();
        assert_eq!(records[0]["c"], Value::Null);
    }

    #[test]
    fn csv_json_round_trip_requotes_commas() {
        let json_bytes = csv_to_json("name,note\n\"Jane\",\"hi, there\"\n").unwrap();
        let parsed: Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(parsed, json!([{"name": "Jane", "note": "hi, there"}]));

        let csv_bytes = json_to_csv(&json_bytes).unwrap();
        let csv = String::from_utf8(csv_bytes).unwrap();
        assert_eq!(csv, "name,note\nJane,\"hi, there\"\n");
    }

    #[test]
    fn empty_csv_becomes_empty_outputs() {
        assert_eq!(csv_to_json("").unwrap(), b"[]");
        assert_eq!(csv_to_json("a,b\n").unwrap(), b"[]");
        assert_eq!(csv_to_markdown("a,b\n").unwrap(), b"");
        assert_eq!(csv_to_markdown("").unwrap(), b"");
    }

    #[test]
    fn markdown_table_shape() {
        let md = String::from_utf8(csv_to_markdown("a,b\n1,2\n3,4\n").unwrap()).unwrap();
        assert_eq!(md, "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
    }

    #[test]
    fn records_union_columns_in_first_appearance_order() {
        let records = vec![
            serde_json::from_value::<Map<String, Value>>(json!({"a": 1, "b": 2})).unwrap(),
            serde_json::from_value::<Map<String, Value>>(json!({"b": 3, "c": 4})).unwrap(),
        ];
        let table = Table::from_records(&records);
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(table.rows[1][0], Value::Null);
        assert_eq!(table.rows[1][2], json!(4));
    }

    #[test]
    fn single_object_becomes_one_row() {
        let records = records_from_json(br#"{"k": "v"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["k"], json!("v"));
    }

    #[test]
    fn non_object_rows_are_a_decode_failure() {
        let err = records_from_json(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { what: "json", .. }));
        let err = records_from_json(b"\"scalar\"").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { what: "json", .. }));
    }

    #[test]
    fn non_string_cells_render_via_json() {
        let records = vec![serde_json::from_value::<Map<String, Value>>(
            json!({"n": 1.5, "flag": true, "tags": ["x", "y"]}),
        )
        .unwrap()];
        let csv = Table::from_records(&records).to_csv();
        assert_eq!(csv, "n,flag,tags\n1.5,true,\"[\"\"x\"\",\"\"y\"\"]\"\n");
    }
}
