use crate::config::job::Job;
use crate::utils::error::{Result, SheetError};
use std::path::Path;

/// 從 TOML 檔案載入工作設定
pub fn job_from_file<P: AsRef<Path>>(path: P) -> Result<Job> {
    let content = std::fs::read_to_string(&path).map_err(SheetError::IoError)?;
    job_from_toml_str(&content)
}

/// 從 TOML 字串解析工作設定，`tool` 欄位決定使用哪個工具。
/// 內容照字面解析，不讀取環境變數。
pub fn job_from_toml_str(content: &str) -> Result<Job> {
    toml::from_str(content).map_err(|e| SheetError::ConfigValidationError {
        field: "toml_parsing".to_string(),
        message: format!("TOML parsing error: {}", e),
    })
}
