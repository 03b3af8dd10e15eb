//! Per-tool job configuration.
//!
//! Each struct backs both a CLI subcommand (`clap::Args`) and a section of a
//! TOML job file (`serde`), so defaults are declared twice: once for clap and
//! once for serde.

use crate::core::parser::TABLE_EXTENSIONS;
use crate::core::serializer::OutputFormat;
use crate::core::transform::clean::CleanOptions;
use crate::core::transform::generator::{DomainSource, EmailPattern, GeneratorOptions};
use crate::core::transform::merge::MergeMode;
use crate::core::transform::pivot::{PivotOptions, DEFAULT_LABEL_PREFIX};
use crate::domain::model::file_name;
use crate::utils::error::{Result, SheetError};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_list, validate_non_empty_string, validate_path,
    validate_positive_number, validate_required_field, Validate,
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

fn default_merge_name() -> String {
    "merged_data".to_string()
}

fn default_divide_name() -> String {
    "divided_files".to_string()
}

fn default_pivot_name() -> String {
    "grouped_data".to_string()
}

fn default_date_range_name() -> String {
    "date_range".to_string()
}

fn default_rows_per_chunk() -> usize {
    1000
}

fn default_label_prefix() -> String {
    DEFAULT_LABEL_PREFIX.to_string()
}

fn validate_output_name(value: &str) -> Result<()> {
    validate_non_empty_string("output_name", value)?;
    validate_path("output_name", value)?;
    if value.contains('/') || value.contains('\\') {
        return Err(SheetError::InvalidConfigValueError {
            field: "output_name".to_string(),
            value: value.to_string(),
            reason: "Output name must be a plain file name".to_string(),
        });
    }
    Ok(())
}

fn validate_table_inputs(inputs: &[String]) -> Result<()> {
    validate_non_empty_list(
        "inputs",
        inputs,
        "No files uploaded. Please select at least one file",
    )?;
    validate_file_extensions(inputs, &TABLE_EXTENSIONS)
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct MergeConfig {
    /// Files to merge, in order
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    #[arg(long, value_enum, default_value_t = MergeMode::Concatenate)]
    #[serde(default)]
    pub mode: MergeMode,

    /// Skip rows where every cell is blank
    #[arg(long)]
    #[serde(default)]
    pub skip_empty_rows: bool,

    #[arg(long, default_value = "merged_data")]
    #[serde(default = "default_merge_name")]
    pub output_name: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    #[serde(default)]
    pub format: OutputFormat,
}

impl Validate for MergeConfig {
    fn validate(&self) -> Result<()> {
        validate_table_inputs(&self.inputs)?;
        validate_output_name(&self.output_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct SplitConfig {
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Maximum number of data rows per output file
    #[arg(long, default_value_t = 1000)]
    #[serde(default = "default_rows_per_chunk")]
    pub rows_per_chunk: usize,
}

impl Validate for SplitConfig {
    fn validate(&self) -> Result<()> {
        validate_table_inputs(&self.inputs)?;
        validate_positive_number("rows_per_chunk", self.rows_per_chunk, 1)
    }
}

/// Category column chosen for one specific input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileColumn {
    pub file: String,
    pub column: String,
}

fn parse_file_column(value: &str) -> std::result::Result<FileColumn, String> {
    match value.split_once('=') {
        Some((file, column)) if !file.trim().is_empty() && !column.trim().is_empty() => {
            Ok(FileColumn {
                file: file.trim().to_string(),
                column: column.trim().to_string(),
            })
        }
        _ => Err(format!("expected FILE=COLUMN, got '{}'", value)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct DivideConfig {
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Category column used for every file without its own override
    #[arg(long)]
    #[serde(default)]
    pub category_column: Option<String>,

    /// Category column for a single file
    #[arg(long = "file-column", value_name = "FILE=COLUMN", value_parser = parse_file_column)]
    #[serde(default)]
    pub file_columns: Vec<FileColumn>,

    #[arg(long, default_value = "divided_files")]
    #[serde(default = "default_divide_name")]
    pub output_name: String,
}

impl DivideConfig {
    /// Column to split `file` on: the per-file override, else the shared one.
    pub fn column_for(&self, file: &str) -> Option<&str> {
        self.file_columns
            .iter()
            .find(|fc| fc.file == file || file_name(&fc.file) == file_name(file))
            .map(|fc| fc.column.as_str())
            .or(self.category_column.as_deref())
            .filter(|column| !column.trim().is_empty())
    }
}

impl Validate for DivideConfig {
    fn validate(&self) -> Result<()> {
        validate_table_inputs(&self.inputs)?;
        validate_output_name(&self.output_name)?;
        for input in &self.inputs {
            if self.column_for(input).is_none() {
                return Err(SheetError::MissingConfigError {
                    field: format!("category_column for {}", input),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct CleanConfig {
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Drop rows where every cell is blank
    #[arg(long)]
    #[serde(default)]
    pub remove_blank_rows: bool,

    /// Drop columns without a single non-blank value
    #[arg(long)]
    #[serde(default)]
    pub remove_empty_columns: bool,
}

impl CleanConfig {
    pub fn options(&self) -> CleanOptions {
        CleanOptions {
            remove_blank_rows: self.remove_blank_rows,
            remove_empty_columns: self.remove_empty_columns,
        }
    }
}

impl Validate for CleanConfig {
    fn validate(&self) -> Result<()> {
        validate_file_extensions(std::slice::from_ref(&self.input), &TABLE_EXTENSIONS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct PivotConfig {
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Column whose value identifies a group
    #[arg(long)]
    #[serde(default)]
    pub group_column: Option<String>,

    /// Columns repeated once per group member, comma separated
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    pub repeat_columns: Vec<String>,

    /// Prefix of the generated column labels
    #[arg(long, default_value = DEFAULT_LABEL_PREFIX)]
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    #[arg(long, default_value = "grouped_data")]
    #[serde(default = "default_pivot_name")]
    pub output_name: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    #[serde(default)]
    pub format: OutputFormat,
}

impl PivotConfig {
    pub fn options(&self) -> Result<PivotOptions> {
        let group_column = validate_required_field("group_column", &self.group_column)?;
        Ok(PivotOptions {
            group_column: group_column.clone(),
            repeat_columns: self.repeat_columns.clone(),
            label_prefix: self.label_prefix.clone(),
        })
    }
}

impl Validate for PivotConfig {
    fn validate(&self) -> Result<()> {
        validate_file_extensions(std::slice::from_ref(&self.input), &TABLE_EXTENSIONS)?;
        validate_output_name(&self.output_name)?;
        let group_column = validate_required_field("group_column", &self.group_column)?;
        validate_non_empty_string("group_column", group_column)?;
        validate_non_empty_list(
            "repeat_columns",
            &self.repeat_columns,
            "Select at least one column to repeat",
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct ExtractConfig {
    /// Plain text file to scan
    #[arg(value_name = "FILE")]
    pub input: String,
}

impl Validate for ExtractConfig {
    fn validate(&self) -> Result<()> {
        validate_file_extensions(std::slice::from_ref(&self.input), &["txt"])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct GenerateConfig {
    #[arg(value_name = "FILE")]
    pub input: String,

    #[arg(long)]
    #[serde(default)]
    pub first_name_column: Option<String>,

    #[arg(long)]
    #[serde(default)]
    pub last_name_column: Option<String>,

    /// Domain used for every row, e.g. example.com or @example.com
    #[arg(long, conflicts_with = "domain_column")]
    #[serde(default)]
    pub domain: Option<String>,

    /// Column holding the domain of each row
    #[arg(long)]
    #[serde(default)]
    pub domain_column: Option<String>,

    /// Naming patterns, comma separated (e.g. first.last,f_last)
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    pub patterns: Vec<EmailPattern>,
}

impl GenerateConfig {
    pub fn domain_source(&self) -> Result<DomainSource> {
        let domain = self.domain.as_deref().filter(|d| !d.trim().is_empty());
        let column = self.domain_column.as_deref().filter(|c| !c.trim().is_empty());
        match (domain, column) {
            (Some(domain), None) => Ok(DomainSource::Fixed(domain.to_string())),
            (None, Some(column)) => Ok(DomainSource::Column(column.to_string())),
            (None, None) => Err(SheetError::MissingConfigError {
                field: "domain or domain_column".to_string(),
            }),
            (Some(_), Some(_)) => Err(SheetError::ConfigValidationError {
                field: "domain".to_string(),
                message: "Use either a fixed domain or a domain column, not both".to_string(),
            }),
        }
    }

    pub fn options(&self) -> Result<GeneratorOptions> {
        Ok(GeneratorOptions {
            first_name_column: validate_required_field(
                "first_name_column",
                &self.first_name_column,
            )?
            .clone(),
            last_name_column: validate_required_field("last_name_column", &self.last_name_column)?
                .clone(),
            domain: self.domain_source()?,
            patterns: self.patterns.clone(),
        })
    }
}

impl Validate for GenerateConfig {
    fn validate(&self) -> Result<()> {
        validate_file_extensions(std::slice::from_ref(&self.input), &TABLE_EXTENSIONS)?;
        let options = self.options()?;
        validate_non_empty_string("first_name_column", &options.first_name_column)?;
        validate_non_empty_string("last_name_column", &options.last_name_column)?;
        validate_non_empty_list(
            "patterns",
            &options.patterns,
            "Select at least one email pattern",
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct DateRangeConfig {
    /// First date (YYYY-MM-DD), included
    #[arg(long)]
    pub start: NaiveDate,

    /// Last date (YYYY-MM-DD), included
    #[arg(long)]
    pub end: NaiveDate,

    #[arg(long, default_value = "date_range")]
    #[serde(default = "default_date_range_name")]
    pub output_name: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    #[serde(default)]
    pub format: OutputFormat,
}

impl Validate for DateRangeConfig {
    fn validate(&self) -> Result<()> {
        validate_output_name(&self.output_name)?;
        if self.start > self.end {
            return Err(SheetError::InvalidConfigValueError {
                field: "start".to_string(),
                value: self.start.to_string(),
                reason: format!("Start date must not be after end date ({})", self.end),
            });
        }
        Ok(())
    }
}

/// One run of one tool.
#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
#[serde(tag = "tool", rename_all = "kebab-case")]
pub enum Job {
    /// Merge several CSV/XLSX files into one
    Merge(MergeConfig),
    /// Split files into chunks of N rows, bundled in a zip per file
    Split(SplitConfig),
    /// Split files into one file per value of a category column
    Divide(DivideConfig),
    /// Remove blank rows and/or empty columns
    Clean(CleanConfig),
    /// Collapse rows sharing a key into one wide row
    Pivot(PivotConfig),
    /// Collect the email addresses found in a text file
    ExtractEmails(ExtractConfig),
    /// Generate candidate email addresses from name columns
    GenerateEmails(GenerateConfig),
    /// Generate a single-column sheet of consecutive dates
    DateRange(DateRangeConfig),
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::Merge(_) => "merge",
            Job::Split(_) => "split",
            Job::Divide(_) => "divide",
            Job::Clean(_) => "clean",
            Job::Pivot(_) => "pivot",
            Job::ExtractEmails(_) => "extract-emails",
            Job::GenerateEmails(_) => "generate-emails",
            Job::DateRange(_) => "date-range",
        }
    }

    /// Input files in the order they are read.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Job::Merge(c) => c.inputs.iter().map(String::as_str).collect(),
            Job::Split(c) => c.inputs.iter().map(String::as_str).collect(),
            Job::Divide(c) => c.inputs.iter().map(String::as_str).collect(),
            Job::Clean(c) => vec![c.input.as_str()],
            Job::Pivot(c) => vec![c.input.as_str()],
            Job::ExtractEmails(c) => vec![c.input.as_str()],
            Job::GenerateEmails(c) => vec![c.input.as_str()],
            Job::DateRange(_) => Vec::new(),
        }
    }
}

impl Validate for Job {
    fn validate(&self) -> Result<()> {
        match self {
            Job::Merge(c) => c.validate(),
            Job::Split(c) => c.validate(),
            Job::Divide(c) => c.validate(),
            Job::Clean(c) => c.validate(),
            Job::Pivot(c) => c.validate(),
            Job::ExtractEmails(c) => c.validate(),
            Job::GenerateEmails(c) => c.validate(),
            Job::DateRange(c) => c.validate(),
        }
    }
}
