use thiserror::Error;

/// Why a picture could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("failed to read picture: {0}")]
    Failed(String),
    #[error("reading the picture was aborted")]
    Aborted,
}

/// Every failure an effect can fold into a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("unexpected response at {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("service reported an error: {0}")]
    Remote(String),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("the classifier returned no labels")]
    EmptyResult,
    #[error("no label matched a known breed")]
    NoMatch,
}
