//! Batch screening of payment transactions.
//!
//! Each raw batch is cleaned (schema check, normalization, deduplication, IQR outlier
//! removal) and scored by a fixed set of deterministic rules into a normal and a
//! suspicious partition.

pub mod cleaning;
pub mod engine;
#[cfg(test)]
mod fixtures;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod types;

pub use cleaning::CleaningPipeline;
pub use engine::BatchEngine;
pub use models::{CleanedBatch, RawBatch, TransactionRecord};
pub use pipeline::{BatchProcessor, PipelineError};
pub use scoring::{RuleEngine, ScoredBatch};
pub use settings::PipelineConfig;
