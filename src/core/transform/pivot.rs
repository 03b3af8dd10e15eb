use crate::domain::model::{Cell, Row, Table};
use crate::utils::error::{Result, SheetError};
use std::collections::HashMap;

pub const DEFAULT_LABEL_PREFIX: &str = "Director";

#[derive(Debug, Clone, PartialEq)]
pub struct PivotOptions {
    pub group_column: String,
    pub repeat_columns: Vec<String>,
    /// Label put in front of the slot number, e.g. `Director 2 Name`.
    pub label_prefix: String,
}

fn resolve_column(table: &Table, field: &str, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| SheetError::InvalidConfigValueError {
            field: field.to_string(),
            value: name.to_string(),
            reason: format!("Column not found. Available: {}", table.headers.join(", ")),
        })
}

/// Collapses rows sharing a group key into one wide row.
///
/// With `max` the size of the largest group, every output row has
/// `1 + max * repeat_columns.len()` cells; smaller groups are padded with
/// empty strings. Groups are emitted in order of first appearance.
pub fn group_pivot(table: &Table, options: &PivotOptions) -> Result<Table> {
    if options.group_column.trim().is_empty() {
        return Err(SheetError::MissingConfigError {
            field: "group_column".to_string(),
        });
    }
    if options.repeat_columns.is_empty() {
        return Err(SheetError::ValidationError {
            message: "Select at least one column to repeat".to_string(),
        });
    }

    let group_col = resolve_column(table, "group_column", &options.group_column)?;
    let repeat_cols = options
        .repeat_columns
        .iter()
        .map(|name| {
            if name == &options.group_column {
                return Err(SheetError::InvalidConfigValueError {
                    field: "repeat_columns".to_string(),
                    value: name.clone(),
                    reason: "The group column cannot also be repeated".to_string(),
                });
            }
            resolve_column(table, "repeat_columns", name)
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut keys: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in &table.rows {
        let key = row[group_col].to_string();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                keys.push(key);
                Vec::new()
            })
            .push(row);
    }

    let max = groups.values().map(Vec::len).max().unwrap_or(0);

    let mut headers = vec![options.group_column.clone()];
    for slot in 1..=max {
        for name in &options.repeat_columns {
            headers.push(format!("{} {} {}", options.label_prefix, slot, name));
        }
    }

    let width = headers.len();
    let rows = keys
        .into_iter()
        .map(|key| {
            let members = &groups[&key];
            let mut out: Row = Vec::with_capacity(width);
            out.push(Cell::Text(key.clone()));
            for member in members {
                out.extend(repeat_cols.iter().map(|&col| member[col].clone()));
            }
            out.resize(width, Cell::Text(String::new()));
            out
        })
        .collect();

    tracing::debug!(
        "Grouped {} row(s) into {} group(s), largest group has {} member(s)",
        table.len(),
        groups.len(),
        max
    );

    Ok(Table::new(headers, rows))
}
