use crate::domain::model::Table;
use crate::utils::error::{Result, SheetError};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const UNCATEGORIZED: &str = "Uncategorized";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid filename regex"));

/// One chunk of a row-count split. `start`/`end` are 1-based, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: String,
    pub table: Table,
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_segment(value: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(value, "_").into_owned()
}

pub fn split_by_chunk(table: &Table, rows_per_chunk: usize) -> Result<Vec<Chunk>> {
    if rows_per_chunk == 0 {
        return Err(SheetError::InvalidConfigValueError {
            field: "rows_per_chunk".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        });
    }

    let chunks = table
        .rows
        .chunks(rows_per_chunk)
        .enumerate()
        .map(|(i, rows)| {
            let start = i * rows_per_chunk + 1;
            Chunk {
                start,
                end: start + rows.len() - 1,
                table: Table::new(table.headers.clone(), rows.to_vec()),
            }
        })
        .collect();

    Ok(chunks)
}

/// Groups rows by the text of `column`, buckets in first-seen order.
/// Blank values land in the `Uncategorized` bucket.
pub fn split_by_category(table: &Table, column: &str) -> Result<Vec<CategoryBucket>> {
    let col = table
        .column_index(column)
        .ok_or_else(|| SheetError::InvalidConfigValueError {
            field: "category_column".to_string(),
            value: column.to_string(),
            reason: format!("Column not found. Available: {}", table.headers.join(", ")),
        })?;

    let mut buckets: Vec<CategoryBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let value = row[col].to_string();
        let category = if value.trim().is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            value
        };

        let slot = match index.get(&category) {
            Some(&slot) => slot,
            None => {
                buckets.push(CategoryBucket {
                    category: category.clone(),
                    table: Table::new(table.headers.clone(), Vec::new()),
                });
                index.insert(category, buckets.len() - 1);
                buckets.len() - 1
            }
        };
        buckets[slot].table.rows.push(row.clone());
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Cell;

    fn numbered(rows: usize) -> Table {
        Table::new(
            vec!["n".to_string()],
            (1..=rows).map(|n| vec![Cell::Number(n as f64)]).collect(),
        )
    }

    #[test]
    fn test_split_by_chunk_sizes() {
        let chunks = split_by_chunk(&numbered(100), 30).unwrap();
        let sizes: Vec<usize> = chunks.iter().map(|c| c.table.len()).collect();
        assert_eq!(sizes, vec![30, 30, 30, 10]);
        assert_eq!((chunks[0].start, chunks[0].end), (1, 30));
        assert_eq!((chunks[3].start, chunks[3].end), (91, 100));
        assert!(chunks.iter().all(|c| c.table.headers == vec!["n"]));
        assert_eq!(chunks[1].table.cell_text(0, 0), "31");
    }

    #[test]
    fn test_split_by_chunk_single_and_empty() {
        assert_eq!(split_by_chunk(&numbered(10), 10).unwrap().len(), 1);
        assert_eq!(split_by_chunk(&numbered(10), 500).unwrap().len(), 1);
        assert!(split_by_chunk(&numbered(0), 5).unwrap().is_empty());
        assert!(split_by_chunk(&numbered(3), 0).is_err());
    }

    #[test]
    fn test_split_by_category() {
        let table = Table::new(
            vec!["name".to_string(), "team".to_string()],
            vec![
                vec![Cell::from("ann"), Cell::from("A")],
                vec![Cell::from("bob"), Cell::from("B")],
                vec![Cell::from("cid"), Cell::from("A")],
                vec![Cell::from("dee"), Cell::from("")],
            ],
        );
        let buckets = split_by_category(&table, "team").unwrap();

        let summary: Vec<(&str, usize)> = buckets
            .iter()
            .map(|b| (b.category.as_str(), b.table.len()))
            .collect();
        assert_eq!(summary, vec![("A", 2), ("B", 1), (UNCATEGORIZED, 1)]);
        assert_eq!(buckets[0].table.cell_text(1, 0), "cid");
        assert_eq!(buckets[0].table.headers, table.headers);
    }

    #[test]
    fn test_split_by_category_unknown_column() {
        assert!(matches!(
            split_by_category(&numbered(2), "team"),
            Err(SheetError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("North America/EU"), "North_America_EU");
        assert_eq!(sanitize_segment("ok_name-1"), "ok_name-1");
        assert_eq!(sanitize_segment("café"), "caf_");
    }
}
