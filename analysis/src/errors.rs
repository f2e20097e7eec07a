use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BarsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type BarsResult<T> = Result<T, BarsError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to serialize visualization: {0}")]
    Serialize(#[from] serde_json::Error),
}
