use std::fmt;

/// A single cell. CSV input only ever yields `Text`; spreadsheet input keeps
/// numbers as numbers until serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
            Cell::Blank => true,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // 整數值不輸出小數點，與試算表的顯示一致
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Blank => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

pub type Row = Vec<Cell>;

/// Headers plus rows. Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text at `(row, col)`, empty for out-of-range positions.
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.to_string())
            .unwrap_or_default()
    }
}

/// A parsed table together with the name of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub name: String,
    pub table: Table,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    /// File name without directory and without extension.
    pub fn base_name(&self) -> String {
        base_name(&self.name)
    }
}

/// Last component of `path`.
pub fn file_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn base_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// What the extract stage hands to the transform stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(FileDescriptor),
    Text { name: String, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub file_name: String,
    pub table: Table,
}

impl NamedTable {
    pub fn new(file_name: impl Into<String>, table: Table) -> Self {
        Self {
            file_name: file_name.into(),
            table,
        }
    }
}

/// One downloadable artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Table(NamedTable),
    Archive {
        file_name: String,
        entries: Vec<NamedTable>,
    },
    Text {
        file_name: String,
        content: String,
    },
}

impl Output {
    pub fn file_name(&self) -> &str {
        match self {
            Output::Table(named) => &named.file_name,
            Output::Archive { file_name, .. } | Output::Text { file_name, .. } => file_name,
        }
    }
}

/// Row/column counts before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanSummary {
    pub original_rows: usize,
    pub final_rows: usize,
    pub original_columns: usize,
    pub final_columns: usize,
}

impl CleanSummary {
    pub fn rows_removed(&self) -> usize {
        self.original_rows - self.final_rows
    }

    pub fn columns_removed(&self) -> usize {
        self.original_columns - self.final_columns
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub outputs: Vec<Output>,
    pub warnings: Vec<String>,
    pub clean_summary: Option<CleanSummary>,
}

impl TransformResult {
    pub fn single(output: Output) -> Self {
        Self {
            outputs: vec![output],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::from("abc").to_string(), "abc");
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(-12.0).to_string(), "-12");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Blank.to_string(), "");
    }

    #[test]
    fn test_cell_is_blank() {
        assert!(Cell::Blank.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from(" x ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_table_lookup() {
        let table = Table::new(
            vec!["id".to_string(), "name".to_string()],
            vec![vec![Cell::Number(1.0), Cell::from("Ann")]],
        );
        assert_eq!(table.column_index("name"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.cell_text(0, 0), "1");
        assert_eq!(table.cell_text(5, 0), "");
    }

    #[test]
    fn test_base_name() {
        let file = FileDescriptor::new("data/2024/contacts.final.csv", Table::default());
        assert_eq!(file.base_name(), "contacts.final");
        assert_eq!(base_name("plain"), "plain");
        assert_eq!(file_name("data/2024/contacts.csv"), "contacts.csv");
    }
}
