use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no snapshot could be fetched")]
    NoSnapshots,
    #[error("no trajectory point could be reconstructed")]
    NoPoints,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
