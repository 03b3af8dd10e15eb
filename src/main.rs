use clap::Parser;
use sheet_utils::utils::error::ErrorSeverity;
use sheet_utils::utils::{logger, validation::Validate};
use sheet_utils::{CliConfig, LocalStorage, ToolEngine, ToolPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting sheet-utils");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入並驗證工作設定，任何檔案讀取前就先擋下
    let job = match config.job().and_then(|job| job.validate().map(|_| job)) {
        Ok(job) => job,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("🔧 Running tool: {}", job.name());

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ToolPipeline::new(storage, job);
    let engine = ToolEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("⚠️  {}", warning);
            }
            println!("✅ Done!");
            for path in &report.written {
                println!("📁 Output saved to: {}/{}", config.output_path, path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
