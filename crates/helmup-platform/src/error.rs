use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),

    #[error("no usable home directory for the current user")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
