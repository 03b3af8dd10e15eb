use crate::domain::model::{Cell, CleanSummary, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanOptions {
    pub remove_blank_rows: bool,
    pub remove_empty_columns: bool,
}

/// Drops blank rows first, then columns without a single non-blank cell.
pub fn clean(table: &Table, options: CleanOptions) -> (Table, CleanSummary) {
    let mut rows = table.rows.clone();
    if options.remove_blank_rows {
        rows.retain(|row| !row.iter().all(Cell::is_blank));
    }

    let mut headers = table.headers.clone();
    if options.remove_empty_columns {
        let keep: Vec<usize> = (0..headers.len())
            .filter(|&col| rows.iter().any(|row| !row[col].is_blank()))
            .collect();

        headers = keep.iter().map(|&col| headers[col].clone()).collect();
        rows = rows
            .into_iter()
            .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
            .collect();
    }

    let summary = CleanSummary {
        original_rows: table.len(),
        final_rows: rows.len(),
        original_columns: table.width(),
        final_columns: headers.len(),
    };

    (Table::new(headers, rows), summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messy() -> Table {
        Table::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![
                vec![Cell::from("1"), Cell::from(""), Cell::from("x")],
                vec![Cell::from(" "), Cell::Blank, Cell::from("")],
                vec![Cell::from("2"), Cell::from("  "), Cell::Blank],
            ],
        )
    }

    #[test]
    fn test_clean_both_options() {
        let options = CleanOptions {
            remove_blank_rows: true,
            remove_empty_columns: true,
        };
        let (cleaned, summary) = clean(&messy(), options);

        assert_eq!(cleaned.headers, vec!["a", "c"]);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.cell_text(1, 0), "2");
        assert_eq!(summary.rows_removed(), 1);
        assert_eq!(summary.columns_removed(), 1);
        assert_eq!(summary.original_columns, 3);
        assert_eq!(summary.final_rows, 2);
    }

    #[test]
    fn test_clean_rows_only() {
        let options = CleanOptions {
            remove_blank_rows: true,
            remove_empty_columns: false,
        };
        let (cleaned, summary) = clean(&messy(), options);
        assert_eq!(cleaned.width(), 3);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(summary.columns_removed(), 0);
    }

    #[test]
    fn test_clean_no_options_is_identity() {
        let table = messy();
        let (cleaned, summary) = clean(&table, CleanOptions::default());
        assert_eq!(cleaned, table);
        assert_eq!(summary.rows_removed(), 0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let options = CleanOptions {
            remove_blank_rows: true,
            remove_empty_columns: true,
        };
        let (once, _) = clean(&messy(), options);
        let (twice, summary) = clean(&once, options);
        assert_eq!(once, twice);
        assert_eq!(summary.rows_removed(), 0);
        assert_eq!(summary.columns_removed(), 0);
    }
}
