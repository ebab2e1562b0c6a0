mod cleaning_pipeline;
mod normalizer;
mod outlier;
#[cfg(test)]
mod tests;
mod validator;

pub use cleaning_pipeline::CleaningPipeline;
pub use normalizer::{NormalizationReport, Normalizer};
pub use outlier::OutlierFilter;
pub use validator::{missing_fields, recover_semicolon_columns, SchemaValidator};
