use crate::core::Pipeline;
use crate::utils::error::Result;

/// Files written by one run plus the non-fatal notes collected on the way.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub written: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct ToolEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ToolEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting run...");

        // Extract
        tracing::debug!("Reading input files...");
        let sources = self.pipeline.extract().await?;
        tracing::info!("Read {} input file(s)", sources.len());

        // Transform
        tracing::debug!("Transforming data...");
        let result = self.pipeline.transform(sources).await?;
        for warning in &result.warnings {
            tracing::warn!("⚠️  {}", warning);
        }
        let warnings = result.warnings.clone();

        // Load
        tracing::debug!("Writing {} output file(s)...", result.outputs.len());
        let written = self.pipeline.load(result).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(RunReport { written, warnings })
    }
}
