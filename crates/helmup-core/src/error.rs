use crate::provision::ProvisionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("error while installing {tool}: {source}")]
    Install {
        tool: String,
        #[source]
        source: ProvisionError,
    },

    #[error("canceled before {tool} was resolved")]
    Canceled { tool: String },
}

impl ResolveError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, ResolveError::Canceled { .. })
    }
}
