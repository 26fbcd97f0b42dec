use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The line source failed mid-stream. The build is abandoned.
    #[error("failed to read document: {0}")]
    SourceRead(#[from] std::io::Error),
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid build configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid query argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
