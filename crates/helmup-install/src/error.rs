use helmup_core::ProvisionError;
use helmup_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] helmup_archive::ArchiveError),

    #[error(transparent)]
    Platform(#[from] helmup_platform::Error),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InstallError {
    fn is_canceled(&self) -> bool {
        matches!(self, InstallError::Fetch(FetchError::Canceled))
    }
}

impl From<InstallError> for ProvisionError {
    fn from(err: InstallError) -> Self {
        if err.is_canceled() {
            ProvisionError::Canceled
        } else {
            ProvisionError::failed(err)
        }
    }
}
