pub mod enrich;
mod error;
pub mod output;
pub mod runner;

pub use enrich::{enrich, EnrichLimits};
pub use error::{PipelineError, PipelineResult};
pub use output::{log_preview, read_points, write_points};
pub use runner::Runner;
