use crate::utils::error::{Result, SheetError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SheetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SheetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SheetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Lower-cased extension of a file name, without the dot.
pub fn file_extension(file: &str) -> Option<String> {
    std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn validate_file_extensions(files: &[String], allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match file_extension(file) {
            Some(extension) if allowed_set.contains(extension.as_str()) => {}
            Some(extension) => {
                return Err(SheetError::UnsupportedFileError {
                    path: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(SheetError::UnsupportedFileError {
                    path: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SheetError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SheetError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T], message: &str) -> Result<()> {
    if values.is_empty() {
        return Err(SheetError::ValidationError {
            message: format!("{} ({})", message, field_name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("rows_per_chunk", 5, 1).is_ok());
        assert!(validate_positive_number("rows_per_chunk", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["data.csv".to_string(), "Report.XLSX".to_string()];
        assert!(validate_file_extensions(&files, &["csv", "xlsx", "xls"]).is_ok());

        let invalid_files = vec!["data.txt".to_string()];
        assert!(matches!(
            validate_file_extensions(&invalid_files, &["csv", "xlsx"]),
            Err(SheetError::UnsupportedFileError { .. })
        ));

        let no_extension = vec!["README".to_string()];
        assert!(validate_file_extensions(&no_extension, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_required_and_non_empty() {
        let column: Option<String> = None;
        assert!(matches!(
            validate_required_field("group_column", &column),
            Err(SheetError::MissingConfigError { .. })
        ));
        assert!(validate_non_empty_string("output_name", "   ").is_err());
        assert!(validate_non_empty_string("output_name", "merged").is_ok());
        assert!(validate_non_empty_list::<String>("inputs", &[], "No files uploaded").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "a\0b").is_err());
    }
}
