use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("download canceled")]
    Canceled,

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
