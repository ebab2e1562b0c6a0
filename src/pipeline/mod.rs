mod errors;
mod processor;
mod stages;

pub use errors::PipelineError;
pub use processor::{BatchProcessor, BatchReport};
pub use stages::{Cleaner, PendingStage, Scorer};
