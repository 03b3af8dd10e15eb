use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet decoding error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Spreadsheet encoding error: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported file '{path}': {reason}")]
    UnsupportedFileError { path: String, reason: String },

    #[error("File '{path}' is empty")]
    EmptyInputError { path: String },

    #[error("No valid email addresses found in '{path}'")]
    NoEmailsFoundError { path: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤分類，對應輸入、設定、資料品質與系統四種來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    DataQuality,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SheetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SheetError::UnsupportedFileError { .. }
            | SheetError::EmptyInputError { .. }
            | SheetError::SpreadsheetError(_)
            | SheetError::CsvError(_) => ErrorCategory::Input,
            SheetError::ConfigValidationError { .. }
            | SheetError::MissingConfigError { .. }
            | SheetError::InvalidConfigValueError { .. }
            | SheetError::ValidationError { .. } => ErrorCategory::Configuration,
            SheetError::NoEmailsFoundError { .. } | SheetError::ProcessingError { .. } => {
                ErrorCategory::DataQuality
            }
            SheetError::ZipError(_) | SheetError::XlsxWriteError(_) | SheetError::IoError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::DataQuality => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息（取代瀏覽器的 alert）
    pub fn user_friendly_message(&self) -> String {
        match self {
            SheetError::UnsupportedFileError { path, .. } => {
                format!("'{}' is not a supported file type", path)
            }
            SheetError::EmptyInputError { path } => {
                format!("'{}' is empty. Please choose a file with data.", path)
            }
            SheetError::SpreadsheetError(_) | SheetError::CsvError(_) => {
                "The file could not be read. It may be corrupted or in an unexpected format."
                    .to_string()
            }
            SheetError::MissingConfigError { field } => {
                format!("Please provide a value for '{}'", field)
            }
            SheetError::NoEmailsFoundError { .. } => "No emails found".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check that the file exists, is not empty and is a .csv, .xlsx or .xls file",
            ErrorCategory::Configuration => "Review the command options (see --help) and try again",
            ErrorCategory::DataQuality => "Inspect the input data; the operation produced no usable output",
            ErrorCategory::System => "Check disk space and permissions of the output directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
