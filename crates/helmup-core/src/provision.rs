use crate::spec::ToolSpec;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure surfaced by a [`Provisioner`].
///
/// Cancellation is its own variant so callers can tell "user aborted" from
/// "installation failed".
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("operation canceled")]
    Canceled,

    #[error("{0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProvisionError {
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ProvisionError::Failed(err.into())
    }
}

/// Service that makes a tool available on the local machine.
///
/// Contract: the returned path points at an existing, executable file placed
/// deterministically under the service's install root. Repeated calls for an
/// already-installed tool return the existing path without downloading again.
/// The cancellation token must be honored across any network or disk work.
pub trait Provisioner: Send + Sync {
    fn ensure(
        &self,
        cancel: CancellationToken,
        spec: &ToolSpec,
    ) -> impl Future<Output = Result<PathBuf, ProvisionError>> + Send;
}
