pub mod cli;
pub mod job;
pub mod toml_config;

use crate::config::job::Job;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-utils")]
#[command(about = "Local spreadsheet utilities: merge, split, clean, pivot and email tools")]
pub struct CliConfig {
    /// Directory the output files are written to
    #[arg(short, long, global = true, default_value = "./output")]
    pub output_path: String,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a job described in a TOML file
    Run {
        /// Path to TOML job file
        #[arg(short, long, default_value = "job.toml")]
        config: String,
    },
    #[command(flatten)]
    Tool(Job),
}

impl CliConfig {
    /// The job to run, loading it from disk for `run`.
    pub fn job(&self) -> Result<Job> {
        match &self.command {
            Command::Run { config } => toml_config::job_from_file(config),
            Command::Tool(job) => Ok(job.clone()),
        }
    }
}
