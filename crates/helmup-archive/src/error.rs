use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unrecognized archive format: {0}")]
    UnknownFormat(String),

    #[error("archive member not found: {0}")]
    MemberNotFound(String),

    #[error("archive entry escapes the extraction root: {0}")]
    UnsafePath(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
