use std::io;

/// Errors raised while parsing documents or running code blocks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("ReadExhausted: input requested but no input lines remain")]
    ReadExhausted,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Interpreter error: {0}")]
    Interpreter(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("Document error: {0}")]
    Document(String),
}

/// Result type alias for snipcheck operations
pub type Result<T> = std::result::Result<T, Error>;
