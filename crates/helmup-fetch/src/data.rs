//! Download configuration and progress types.

use thiserror::Error;

/// Expected sha256 digest of a payload, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha256Digest(String);

#[derive(Debug, Error)]
#[error("invalid sha256 digest: {0}")]
pub struct InvalidDigest(pub String);

impl Sha256Digest {
    pub fn parse(s: &str) -> Result<Self, InvalidDigest> {
        let s = s.trim();
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidDigest(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Sha256Digest {
    type Err = InvalidDigest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Connecting,
    Downloading,
    Verifying,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Progress {
    pub phase: FetchPhase,
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
}

pub type ProgressFn = Box<dyn Fn(&Progress) + Send + Sync>;

/// Per-download knobs. Mechanism only; retry policy stays with the caller.
#[derive(Default)]
pub struct FetchOptions {
    pub(crate) checksum: Option<Sha256Digest>,
    pub(crate) on_progress: Option<ProgressFn>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checksum(mut self, checksum: Sha256Digest) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn with_progress(mut self, on_progress: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(on_progress));
        self
    }
}
