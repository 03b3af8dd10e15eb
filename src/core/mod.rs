pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod serializer;
pub mod transform;

pub use crate::domain::model::{Source, Table, TransformResult};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
