use crate::cleaning::CleaningPipeline;
use crate::models::{CleanedBatch, RawBatch};
use crate::pipeline::PipelineError;
use crate::scoring::{RuleEngine, ScoredBatch};

/// First stage: turns a raw batch into a cleaned batch.
pub trait Cleaner {
    fn clean(&self, raw: RawBatch) -> Result<CleanedBatch, PipelineError>;
}

/// Second stage: partitions a cleaned batch into normal and suspicious records.
pub trait Scorer {
    fn score(&self, batch: CleanedBatch) -> Result<ScoredBatch, PipelineError>;
}

impl Cleaner for CleaningPipeline {
    fn clean(&self, raw: RawBatch) -> Result<CleanedBatch, PipelineError> {
        CleaningPipeline::clean(self, raw)
    }
}

impl Scorer for RuleEngine {
    fn score(&self, batch: CleanedBatch) -> Result<ScoredBatch, PipelineError> {
        Ok(RuleEngine::score(self, batch))
    }
}

/// Placeholder for a stage that has not been written yet; always fails with `UnimplementedStage`.
#[derive(Debug, Clone, Copy)]
pub struct PendingStage {
    name: &'static str
}

impl PendingStage {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Cleaner for PendingStage {
    fn clean(&self, _raw: RawBatch) -> Result<CleanedBatch, PipelineError> {
        Err(PipelineError::unimplemented(self.name))
    }
}

impl Scorer for PendingStage {
    fn score(&self, _batch: CleanedBatch) -> Result<ScoredBatch, PipelineError> {
        Err(PipelineError::unimplemented(self.name))
    }
}
