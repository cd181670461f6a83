use thiserror::Error;

/// Problems with a request that prevent the pipeline from starting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("Please select domains and enter API key")]
    MissingCredential,
    #[error("Please select domains and enter API key")]
    EmptySelection,
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    #[error("analysis depth must be between 1 and 10, got {0}")]
    DepthOutOfRange(i32),
    #[error("unknown focus area: {0}")]
    UnknownFocusArea(String),
}

/// Failure of a single domain's analysis. Never aborts the whole run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum AnalysisError {
    #[error("search failed: {0}")]
    Search(String),
    #[error("model call failed: {0}")]
    Model(String),
    #[error("could not parse model output: {0}")]
    Parse(String),
}
