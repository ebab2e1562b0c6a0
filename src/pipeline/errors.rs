use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Batch contains no records")]
    EmptyBatch,
    #[error("Batch is missing required fields: [{}]", missing.join(", "))]
    Schema {
        missing: Vec<String>
    },
    #[error("Pipeline stage [{stage}] is not implemented")]
    UnimplementedStage {
        stage: &'static str
    },
    #[error("Processing error: {0}")]
    Processing(String)
}

impl PipelineError {
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self::Schema { missing: missing.into_iter().map(Into::into).collect() }
    }

    pub fn unimplemented(stage: &'static str) -> Self {
        Self::UnimplementedStage { stage }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    /// Expected conditions are skipped with a warning; anything else is logged as an error.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Processing(_))
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::Processing(format!("I/O failure: {error}"))
    }
}

impl From<csv::Error> for PipelineError {
    fn from(error: csv::Error) -> Self {
        Self::Processing(format!("CSV failure: {error}"))
    }
}
