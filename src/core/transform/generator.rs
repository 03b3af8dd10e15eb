use crate::domain::model::{Cell, Row, Table};
use crate::utils::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GENERATED_COLUMN: &str = "Generated Email";

/// Local-part naming patterns. `f`/`l` stand for the first letter of the
/// first/last name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmailPattern {
    First,
    Last,
    FirstLast,
    FirstDotLast,
    FirstUnderscoreLast,
    FirstDashLast,
    LastFirst,
    LastDotFirst,
    LastUnderscoreFirst,
    LastDashFirst,
    FLast,
    FDotLast,
    FUnderscoreLast,
    FDashLast,
    FirstL,
    FirstDotL,
    FirstUnderscoreL,
    FirstDashL,
    LastF,
    LastDotF,
    LastUnderscoreF,
    LastDashF,
    FL,
    LF,
}

impl EmailPattern {
    pub const ALL: [EmailPattern; 24] = [
        EmailPattern::First,
        EmailPattern::Last,
        EmailPattern::FirstLast,
        EmailPattern::FirstDotLast,
        EmailPattern::FirstUnderscoreLast,
        EmailPattern::FirstDashLast,
        EmailPattern::LastFirst,
        EmailPattern::LastDotFirst,
        EmailPattern::LastUnderscoreFirst,
        EmailPattern::LastDashFirst,
        EmailPattern::FLast,
        EmailPattern::FDotLast,
        EmailPattern::FUnderscoreLast,
        EmailPattern::FDashLast,
        EmailPattern::FirstL,
        EmailPattern::FirstDotL,
        EmailPattern::FirstUnderscoreL,
        EmailPattern::FirstDashL,
        EmailPattern::LastF,
        EmailPattern::LastDotF,
        EmailPattern::LastUnderscoreF,
        EmailPattern::LastDashF,
        EmailPattern::FL,
        EmailPattern::LF,
    ];

    pub fn id(self) -> &'static str {
        match self {
            EmailPattern::First => "first",
            EmailPattern::Last => "last",
            EmailPattern::FirstLast => "firstlast",
            EmailPattern::FirstDotLast => "first.last",
            EmailPattern::FirstUnderscoreLast => "first_last",
            EmailPattern::FirstDashLast => "first-last",
            EmailPattern::LastFirst => "lastfirst",
            EmailPattern::LastDotFirst => "last.first",
            EmailPattern::LastUnderscoreFirst => "last_first",
            EmailPattern::LastDashFirst => "last-first",
            EmailPattern::FLast => "flast",
            EmailPattern::FDotLast => "f.last",
            EmailPattern::FUnderscoreLast => "f_last",
            EmailPattern::FDashLast => "f-last",
            EmailPattern::FirstL => "firstl",
            EmailPattern::FirstDotL => "first.l",
            EmailPattern::FirstUnderscoreL => "first_l",
            EmailPattern::FirstDashL => "first-l",
            EmailPattern::LastF => "lastf",
            EmailPattern::LastDotF => "last.f",
            EmailPattern::LastUnderscoreF => "last_f",
            EmailPattern::LastDashF => "last-f",
            EmailPattern::FL => "fl",
            EmailPattern::LF => "lf",
        }
    }

    /// Builds the local part from already-cleaned names.
    pub fn local_part(self, first: &str, last: &str) -> String {
        let f = first.chars().next().map(String::from).unwrap_or_default();
        let l = last.chars().next().map(String::from).unwrap_or_default();

        match self {
            EmailPattern::First => first.to_string(),
            EmailPattern::Last => last.to_string(),
            EmailPattern::FirstLast => format!("{first}{last}"),
            EmailPattern::FirstDotLast => format!("{first}.{last}"),
            EmailPattern::FirstUnderscoreLast => format!("{first}_{last}"),
            EmailPattern::FirstDashLast => format!("{first}-{last}"),
            EmailPattern::LastFirst => format!("{last}{first}"),
            EmailPattern::LastDotFirst => format!("{last}.{first}"),
            EmailPattern::LastUnderscoreFirst => format!("{last}_{first}"),
            EmailPattern::LastDashFirst => format!("{last}-{first}"),
            EmailPattern::FLast => format!("{f}{last}"),
            EmailPattern::FDotLast => format!("{f}.{last}"),
            EmailPattern::FUnderscoreLast => format!("{f}_{last}"),
            EmailPattern::FDashLast => format!("{f}-{last}"),
            EmailPattern::FirstL => format!("{first}{l}"),
            EmailPattern::FirstDotL => format!("{first}.{l}"),
            EmailPattern::FirstUnderscoreL => format!("{first}_{l}"),
            EmailPattern::FirstDashL => format!("{first}-{l}"),
            EmailPattern::LastF => format!("{last}{f}"),
            EmailPattern::LastDotF => format!("{last}.{f}"),
            EmailPattern::LastUnderscoreF => format!("{last}_{f}"),
            EmailPattern::LastDashF => format!("{last}-{f}"),
            EmailPattern::FL => format!("{f}{l}"),
            EmailPattern::LF => format!("{l}{f}"),
        }
    }
}

impl fmt::Display for EmailPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EmailPattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EmailPattern::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = EmailPattern::ALL.iter().map(|p| p.id()).collect();
                format!("unknown pattern '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

impl TryFrom<String> for EmailPattern {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmailPattern> for String {
    fn from(pattern: EmailPattern) -> Self {
        pattern.id().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSource {
    /// Same domain for every row (preset or custom).
    Fixed(String),
    /// Domain read per row from this column.
    Column(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub first_name_column: String,
    pub last_name_column: String,
    pub domain: DomainSource,
    pub patterns: Vec<EmailPattern>,
}

/// Strips wrapping quotes, lower-cases and keeps only alphanumerics.
pub fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Ensures a leading `@` and removes embedded quote characters.
pub fn normalize_domain(raw: &str) -> String {
    let domain: String = raw.trim().chars().filter(|&c| c != '"' && c != '\'').collect();
    if domain.starts_with('@') {
        domain
    } else {
        format!("@{}", domain)
    }
}

fn require_column(table: &Table, field: &str, name: &str) -> Result<usize> {
    if name.trim().is_empty() {
        return Err(SheetError::MissingConfigError {
            field: field.to_string(),
        });
    }
    table
        .column_index(name)
        .ok_or_else(|| SheetError::InvalidConfigValueError {
            field: field.to_string(),
            value: name.to_string(),
            reason: format!("Column not found. Available: {}", table.headers.join(", ")),
        })
}

/// Emits one row per (input row, pattern) with the address appended.
pub fn generate_emails(table: &Table, options: &GeneratorOptions) -> Result<Table> {
    if options.patterns.is_empty() {
        return Err(SheetError::ValidationError {
            message: "Select at least one email pattern".to_string(),
        });
    }

    let first_col = require_column(table, "first_name_column", &options.first_name_column)?;
    let last_col = require_column(table, "last_name_column", &options.last_name_column)?;
    let domain_col = match &options.domain {
        DomainSource::Fixed(domain) if domain.trim().is_empty() => {
            return Err(SheetError::MissingConfigError {
                field: "domain".to_string(),
            })
        }
        DomainSource::Fixed(_) => None,
        DomainSource::Column(name) => Some(require_column(table, "domain_column", name)?),
    };
    let fixed_domain = match &options.domain {
        DomainSource::Fixed(domain) => normalize_domain(domain),
        DomainSource::Column(_) => String::new(),
    };

    let mut headers = table.headers.clone();
    headers.push(GENERATED_COLUMN.to_string());

    let mut rows = Vec::with_capacity(table.len() * options.patterns.len());
    for row in &table.rows {
        let first = clean_name(&row[first_col].to_string());
        let last = clean_name(&row[last_col].to_string());
        let domain = match domain_col {
            Some(col) => normalize_domain(&row[col].to_string()),
            None => fixed_domain.clone(),
        };

        for pattern in &options.patterns {
            let mut out: Row = row.clone();
            out.push(Cell::Text(format!("{}{}", pattern.local_part(&first, &last), domain)));
            rows.push(out);
        }
    }

    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(n: usize) -> Table {
        Table::new(
            vec![
                "First".to_string(),
                "Last".to_string(),
                "Site".to_string(),
            ],
            (0..n)
                .map(|i| {
                    vec![
                        Cell::from(format!("Name{}", i)),
                        Cell::from("O'Brien"),
                        Cell::from("\"corp.io\""),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("O'Brien"), "obrien");
        assert_eq!(clean_name("  \"Mary-Jane\"  "), "maryjane");
        assert_eq!(clean_name("'Zoë 2'"), "zo2");
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("example.com"), "@example.com");
        assert_eq!(normalize_domain("@example.com"), "@example.com");
        assert_eq!(normalize_domain("\"corp.io\""), "@corp.io");
    }

    #[test]
    fn test_pattern_local_parts() {
        assert_eq!(EmailPattern::ALL.len(), 24);
        assert_eq!(EmailPattern::FirstDotLast.local_part("john", "smith"), "john.smith");
        assert_eq!(EmailPattern::FUnderscoreLast.local_part("john", "smith"), "j_smith");
        assert_eq!(EmailPattern::LastDashF.local_part("john", "smith"), "smith-j");
        assert_eq!(EmailPattern::LF.local_part("john", "smith"), "sj");
        assert_eq!(EmailPattern::FirstL.local_part("john", ""), "john");
    }

    #[test]
    fn test_pattern_ids_parse_back() {
        for pattern in EmailPattern::ALL {
            assert_eq!(pattern.id().parse::<EmailPattern>().unwrap(), pattern);
        }
        assert!("first..last".parse::<EmailPattern>().is_err());
    }

    #[test]
    fn test_generate_fan_out() {
        let patterns = vec![
            EmailPattern::First,
            EmailPattern::FirstDotLast,
            EmailPattern::FLast,
            EmailPattern::LastFirst,
            EmailPattern::FL,
        ];
        let options = GeneratorOptions {
            first_name_column: "First".to_string(),
            last_name_column: "Last".to_string(),
            domain: DomainSource::Fixed("example.com".to_string()),
            patterns,
        };
        let table = generate_emails(&people(10), &options).unwrap();

        assert_eq!(table.len(), 50);
        assert_eq!(table.headers.last().unwrap(), GENERATED_COLUMN);
        assert_eq!(table.cell_text(0, 0), "Name0");
        assert_eq!(table.cell_text(0, 3), "name0@example.com");
        assert_eq!(table.cell_text(1, 3), "name0.obrien@example.com");
        assert_eq!(table.cell_text(2, 3), "nobrien@example.com");
        assert_eq!(table.cell_text(4, 3), "no@example.com");
        assert_eq!(table.cell_text(5, 0), "Name1");

        let first_row: Vec<String> = (0..5).map(|r| table.cell_text(r, 3)).collect();
        let distinct: std::collections::HashSet<&String> = first_row.iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_generate_domain_from_column() {
        let options = GeneratorOptions {
            first_name_column: "First".to_string(),
            last_name_column: "Last".to_string(),
            domain: DomainSource::Column("Site".to_string()),
            patterns: vec![EmailPattern::FDotLast],
        };
        let table = generate_emails(&people(1), &options).unwrap();
        assert_eq!(table.cell_text(0, 3), "n.obrien@corp.io");
    }

    #[test]
    fn test_generate_rejects_missing_configuration() {
        let mut options = GeneratorOptions {
            first_name_column: "First".to_string(),
            last_name_column: "Last".to_string(),
            domain: DomainSource::Fixed("example.com".to_string()),
            patterns: Vec::new(),
        };
        assert!(generate_emails(&people(1), &options).is_err());

        options.patterns = vec![EmailPattern::First];
        options.first_name_column = String::new();
        assert!(matches!(
            generate_emails(&people(1), &options),
            Err(SheetError::MissingConfigError { .. })
        ));

        options.first_name_column = "First".to_string();
        options.domain = DomainSource::Fixed("  ".to_string());
        assert!(generate_emails(&people(1), &options).is_err());

        options.domain = DomainSource::Column("Website".to_string());
        assert!(generate_emails(&people(1), &options).is_err());
    }
}
