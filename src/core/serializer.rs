use crate::domain::model::{Cell, NamedTable, Output, Table};
use crate::utils::error::{Result, SheetError};
use crate::utils::validation::file_extension;
use clap::ValueEnum;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// `.xlsx`/`.xls` file names map to xlsx, everything else to csv.
    pub fn from_file_name(name: &str) -> Self {
        match file_extension(name).as_deref() {
            Some("xlsx") | Some("xls") => OutputFormat::Xlsx,
            _ => OutputFormat::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Xlsx => ".xlsx",
        }
    }
}

pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| SheetError::IoError(e.into_error()))
}

pub fn to_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header.as_str())?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(excel_row, col as u16, s.as_str())?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(excel_row, col as u16, *n)?;
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}

/// Encodes a table in the format implied by its file name.
pub fn encode_table(named: &NamedTable) -> Result<Vec<u8>> {
    match OutputFormat::from_file_name(&named.file_name) {
        OutputFormat::Csv => to_csv(&named.table),
        OutputFormat::Xlsx => to_xlsx(&named.table),
    }
}

pub fn to_zip(entries: &[NamedTable]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for entry in entries {
        let data = encode_table(entry)?;
        zip.start_file::<_, ()>(entry.file_name.as_str(), FileOptions::default())?;
        zip.write_all(&data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn encode_output(output: &Output) -> Result<Vec<u8>> {
    match output {
        Output::Table(named) => encode_table(named),
        Output::Archive { entries, .. } => to_zip(entries),
        Output::Text { content, .. } => Ok(content.as_bytes().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_csv, parse_spreadsheet};
    use std::io::Read;

    fn sample_table() -> Table {
        Table::new(
            vec!["name".to_string(), "age".to_string(), "note".to_string()],
            vec![
                vec![Cell::from("Ann"), Cell::Number(31.0), Cell::Blank],
                vec![Cell::from("Bob"), Cell::Number(2.5), Cell::from("likes tea")],
            ],
        )
    }

    #[test]
    fn test_csv_round_trip() {
        let table = sample_table();
        let bytes = to_csv(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("name,age,note\n"));

        let parsed = parse_csv("out.csv", &text).unwrap();
        assert_eq!(parsed.headers, table.headers);
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                assert_eq!(parsed.cell_text(r, c), cell.to_string());
            }
        }
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let table = Table::new(
            vec!["a".to_string()],
            vec![vec![Cell::from("x, y")], vec![Cell::from(r#"say "hi""#)]],
        );
        let text = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        let parsed = parse_csv("out.csv", &text).unwrap();
        assert_eq!(parsed.cell_text(0, 0), "x, y");
        assert_eq!(parsed.cell_text(1, 0), r#"say "hi""#);
    }

    #[test]
    fn test_xlsx_round_trip() {
        let table = sample_table();
        let bytes = to_xlsx(&table).unwrap();
        let parsed = parse_spreadsheet("out.xlsx", bytes).unwrap();

        assert_eq!(parsed.headers, table.headers);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.rows[0][1], Cell::Number(31.0));
        assert!(parsed.rows[0][2].is_blank());
        assert_eq!(parsed.cell_text(1, 2), "likes tea");
    }

    #[test]
    fn test_zip_entries() {
        let entries = vec![
            NamedTable::new("part_A.csv", sample_table()),
            NamedTable::new("part_B.xlsx", sample_table()),
        ];
        let bytes = to_zip(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("part_A.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("Bob,2.5,likes tea"));
        assert!(archive.by_name("part_B.xlsx").is_ok());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_file_name("a.XLSX"), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_file_name("a.xls"), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_file_name("a.csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::Xlsx.extension(), ".xlsx");
    }
}
