pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, job::Job, CliConfig};
pub use core::{etl::ToolEngine, pipeline::ToolPipeline};
pub use domain::model::{Cell, FileDescriptor, Table};
pub use utils::error::{Result, SheetError};
