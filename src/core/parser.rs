//! Turns uploaded file bytes into a [`Table`].
//!
//! CSV is tokenized line by line; rows whose field count does not match the
//! header row are dropped rather than failing the whole file. Spreadsheets
//! are decoded with `calamine`, first sheet only.

use crate::domain::model::{Cell, Row, Table};
use crate::utils::error::{Result, SheetError};
use crate::utils::validation::file_extension;
use calamine::{Data, Reader};
use std::io::Cursor;

pub const TABLE_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Spreadsheet,
}

impl InputKind {
    pub fn from_path(path: &str) -> Result<Self> {
        match file_extension(path).as_deref() {
            Some("csv") => Ok(InputKind::Csv),
            Some("xlsx") | Some("xls") => Ok(InputKind::Spreadsheet),
            _ => Err(SheetError::UnsupportedFileError {
                path: path.to_string(),
                reason: format!("Allowed extensions: {}", TABLE_EXTENSIONS.join(", ")),
            }),
        }
    }
}

/// Splits one CSV line into trimmed fields.
///
/// A `"` toggles quoted mode, commas inside quotes are kept, and `""` inside
/// quotes is a literal quote. An unterminated quote simply runs to the end of
/// the line.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

pub fn parse_csv(path: &str, text: &str) -> Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let headers = match lines.next() {
        Some(line) => parse_csv_line(line),
        None => {
            return Err(SheetError::EmptyInputError {
                path: path.to_string(),
            })
        }
    };

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let fields = parse_csv_line(line);
        if fields.len() != headers.len() {
            dropped += 1;
            continue;
        }
        rows.push(fields.into_iter().map(Cell::Text).collect::<Row>());
    }

    if dropped > 0 {
        tracing::debug!(
            "Dropped {} row(s) from {} with a field count other than {}",
            dropped,
            path,
            headers.len()
        );
    }

    Ok(Table::new(headers, rows))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Blank,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

pub fn parse_spreadsheet(path: &str, bytes: Vec<u8>) -> Result<Table> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;

    // 只讀取第一個工作表
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Err(SheetError::EmptyInputError {
                path: path.to_string(),
            })
        }
    };

    let mut sheet_rows = range.rows();
    let mut headers: Vec<String> = match sheet_rows.next() {
        Some(first) => first.iter().map(|c| convert_cell(c).to_string()).collect(),
        None => {
            return Err(SheetError::EmptyInputError {
                path: path.to_string(),
            })
        }
    };

    // 工作表範圍會延伸到最寬的資料列，標題列尾端多出的空白格不算欄位
    while headers.last().is_some_and(|h| h.trim().is_empty()) {
        headers.pop();
    }
    if headers.is_empty() {
        return Err(SheetError::EmptyInputError {
            path: path.to_string(),
        });
    }

    let width = headers.len();
    let rows = sheet_rows
        .map(|cells| {
            let mut row: Row = cells.iter().take(width).map(convert_cell).collect();
            row.resize(width, Cell::Blank);
            row
        })
        .collect();

    Ok(Table::new(headers, rows))
}

/// Parses `bytes` according to the extension of `path`.
pub fn parse_table(path: &str, bytes: Vec<u8>) -> Result<Table> {
    if bytes.is_empty() {
        return Err(SheetError::EmptyInputError {
            path: path.to_string(),
        });
    }

    let table = match InputKind::from_path(path)? {
        InputKind::Csv => parse_csv(path, &String::from_utf8_lossy(&bytes))?,
        InputKind::Spreadsheet => parse_spreadsheet(path, bytes)?,
    };

    tracing::debug!(
        "Parsed {}: {} column(s), {} row(s)",
        path,
        table.width(),
        table.len()
    );
    Ok(table)
}
