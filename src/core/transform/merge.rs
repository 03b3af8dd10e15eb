use crate::domain::model::{Cell, FileDescriptor, Row, Table};
use crate::utils::error::{Result, SheetError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Same-schema union: headers of the first file win.
    #[default]
    Concatenate,
    /// Union of every header seen across all files.
    OuterUnion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    /// Files whose header set differs from the first file's.
    pub mismatched: Vec<String>,
}

fn is_blank_row(row: &Row) -> bool {
    row.iter().all(Cell::is_blank)
}

fn header_positions(headers: &[String]) -> HashMap<&str, usize> {
    let mut positions = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        positions.entry(header.as_str()).or_insert(i);
    }
    positions
}

/// Re-keys `row` (laid out by `source`) onto `target` headers by name.
fn project_row(row: &Row, source: &HashMap<&str, usize>, target: &[String]) -> Row {
    target
        .iter()
        .map(|header| {
            source
                .get(header.as_str())
                .and_then(|&i| row.get(i))
                .cloned()
                .unwrap_or(Cell::Blank)
        })
        .collect()
}

fn ensure_files(files: &[FileDescriptor]) -> Result<()> {
    if files.is_empty() {
        return Err(SheetError::ValidationError {
            message: "No files uploaded. Please select at least one file to merge".to_string(),
        });
    }
    Ok(())
}

pub fn concatenate(files: &[FileDescriptor], skip_empty_rows: bool) -> Result<MergeOutcome> {
    ensure_files(files)?;

    let headers = files[0].table.headers.clone();
    let expected: HashSet<&String> = headers.iter().collect();
    let mut mismatched = Vec::new();
    let mut rows = Vec::new();

    for file in files {
        let found: HashSet<&String> = file.table.headers.iter().collect();
        if found != expected {
            // 標題不同只警告，照樣合併
            tracing::warn!(
                "Headers of {} differ from {}; merging anyway",
                file.name,
                files[0].name
            );
            mismatched.push(file.name.clone());
        }

        let positions = header_positions(&file.table.headers);
        for row in &file.table.rows {
            if skip_empty_rows && is_blank_row(row) {
                continue;
            }
            rows.push(project_row(row, &positions, &headers));
        }
    }

    Ok(MergeOutcome {
        table: Table::new(headers, rows),
        mismatched,
    })
}

pub fn outer_union(files: &[FileDescriptor], skip_empty_rows: bool) -> Result<Table> {
    ensure_files(files)?;

    let mut headers: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for header in files.iter().flat_map(|f| f.table.headers.iter()) {
        if seen.insert(header.as_str()) {
            headers.push(header.clone());
        }
    }

    let mut rows = Vec::new();
    for file in files {
        let positions = header_positions(&file.table.headers);
        for row in &file.table.rows {
            if skip_empty_rows && is_blank_row(row) {
                continue;
            }
            rows.push(project_row(row, &positions, &headers));
        }
    }

    Ok(Table::new(headers, rows))
}
