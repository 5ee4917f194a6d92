use crate::client::HttpClient;
use crate::data::{FetchOptions, FetchPhase, Progress};
use crate::error::FetchError;
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

pub struct Fetcher<C> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Download `url` to `destination`.
    ///
    /// The payload streams into a staging file in the destination directory
    /// and is renamed into place only after the optional checksum holds, so
    /// concurrent readers either see the old state or the complete file.
    /// A canceled or failed download removes its staging file.
    pub async fn download(
        &self,
        cancel: &CancellationToken,
        url: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<PathBuf, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Canceled);
        }

        self.notify(options, FetchPhase::Connecting, 0, None);

        // Size is progress cosmetics only; servers without HEAD still work.
        let total_bytes = self.client.head(url).await.ok().flatten();
        self.notify(options, FetchPhase::Connecting, 0, total_bytes);

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent).await?;

        let staging = tempfile::Builder::new()
            .prefix(".helmup-")
            .suffix(".partial")
            .tempfile_in(parent)?;
        let mut file = tokio::fs::File::from_std(staging.as_file().try_clone()?);

        let mut stream = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Canceled),
            opened = self.client.stream(url) => {
                opened.map_err(|e| FetchError::Network(e.to_string()))?
            }
        };

        let mut hasher = Sha256::new();
        let mut bytes_downloaded = 0u64;
        self.notify(options, FetchPhase::Downloading, 0, total_bytes);

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Canceled),
                next = stream.next() => match next {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(e)) => return Err(FetchError::Network(e.to_string())),
                    None => break,
                }
            };

            hasher.update(&chunk);
            file.write_all(&chunk).await?;
            bytes_downloaded += chunk.len() as u64;
            self.notify(options, FetchPhase::Downloading, bytes_downloaded, total_bytes);
        }

        file.flush().await?;
        drop(file);

        self.notify(options, FetchPhase::Verifying, bytes_downloaded, total_bytes);
        if let Some(expected) = &options.checksum {
            let actual = hex::encode(hasher.finalize());
            if actual != expected.as_str() {
                return Err(FetchError::ChecksumMismatch {
                    expected: expected.as_str().to_string(),
                    actual,
                });
            }
        }

        staging
            .persist(destination)
            .map_err(|e| FetchError::Io(e.error))?;

        self.notify(options, FetchPhase::Completed, bytes_downloaded, total_bytes);
        Ok(destination.to_path_buf())
    }

    /// Fetch a small text document (a checksum sidecar) into memory.
    pub async fn fetch_text(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<String, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Canceled);
        }

        let mut stream = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Canceled),
            opened = self.client.stream(url) => {
                opened.map_err(|e| FetchError::Network(e.to_string()))?
            }
        };

        let mut body = Vec::new();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Canceled),
                next = stream.next() => match next {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(e)) => return Err(FetchError::Network(e.to_string())),
                    None => break,
                }
            };
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn notify(
        &self,
        options: &FetchOptions,
        phase: FetchPhase,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    ) {
        if let Some(on_progress) = &options.on_progress {
            on_progress(&Progress {
                phase,
                bytes_downloaded,
                total_bytes,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BoxStream;
    use crate::data::Sha256Digest;
    use bytes::Bytes;
    use std::io;
    use std::sync::{Arc, Mutex};

    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    struct MockClient {
        body: Vec<u8>,
        refuse: bool,
    }

    impl MockClient {
        fn serving(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                refuse: false,
            }
        }

        fn refusing() -> Self {
            Self {
                body: Vec::new(),
                refuse: true,
            }
        }
    }

    impl HttpClient for MockClient {
        type Error = io::Error;

        async fn stream(
            &self,
            _url: &str,
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            if self.refuse {
                return Err(io::Error::other("connection refused"));
            }
            let chunks: Vec<Result<Bytes, io::Error>> = self
                .body
                .chunks(4)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            Ok(Box::pin(futures_util::stream::iter(chunks)))
        }

        async fn head(&self, _url: &str) -> Result<Option<u64>, Self::Error> {
            if self.refuse {
                return Err(io::Error::other("connection refused"));
            }
            Ok(Some(self.body.len() as u64))
        }
    }

    #[tokio::test]
    async fn downloads_and_places_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact.tar.gz");

        let fetcher = Fetcher::new(MockClient::serving(b"hello world"));
        let out = fetcher
            .download(
                &CancellationToken::new(),
                "http://example.invalid/artifact.tar.gz",
                &dest,
                &FetchOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(out, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn leaves_no_staging_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let fetcher = Fetcher::new(MockClient::serving(b"payload"));
        fetcher
            .download(
                &CancellationToken::new(),
                "http://example.invalid/artifact",
                &dest,
                &FetchOptions::new(),
            )
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn verifies_a_matching_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let fetcher = Fetcher::new(MockClient::serving(b"hello world"));
        let options = FetchOptions::new().with_checksum(Sha256Digest::parse(HELLO_SHA256).unwrap());
        assert!(
            fetcher
                .download(&CancellationToken::new(), "http://x.invalid", &dest, &options)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn rejects_a_checksum_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let fetcher = Fetcher::new(MockClient::serving(b"tampered payload"));
        let options = FetchOptions::new().with_checksum(Sha256Digest::parse(HELLO_SHA256).unwrap());
        let err = fetcher
            .download(&CancellationToken::new(), "http://x.invalid", &dest, &options)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::ChecksumMismatch { .. }));
        assert!(err.to_string().contains(HELLO_SHA256));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn cancellation_aborts_without_touching_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let cancel = CancellationToken::new();
        cancel.cancel();

        let fetcher = Fetcher::new(MockClient::serving(b"hello world"));
        let err = fetcher
            .download(&cancel, "http://x.invalid", &dest, &FetchOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Canceled));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn network_failure_surfaces_the_cause() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let fetcher = Fetcher::new(MockClient::refusing());
        let err = fetcher
            .download(&CancellationToken::new(), "http://x.invalid", &dest, &FetchOptions::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn reports_phases_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact");

        let phases = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&phases);
        let options =
            FetchOptions::new().with_progress(move |p| seen.lock().unwrap().push(p.phase));

        let fetcher = Fetcher::new(MockClient::serving(b"hello world"));
        fetcher
            .download(&CancellationToken::new(), "http://x.invalid", &dest, &options)
            .await
            .unwrap();

        let phases = phases.lock().unwrap();
        assert_eq!(phases.first(), Some(&FetchPhase::Connecting));
        assert_eq!(phases.last(), Some(&FetchPhase::Completed));
        assert!(phases.contains(&FetchPhase::Downloading));
        assert!(phases.contains(&FetchPhase::Verifying));
    }

    #[tokio::test]
    async fn fetch_text_collects_the_body() {
        let fetcher = Fetcher::new(MockClient::serving(b"abc123  helm.tar.gz\n"));
        let text = fetcher
            .fetch_text(&CancellationToken::new(), "http://x.invalid/sums")
            .await
            .unwrap();
        assert_eq!(text, "abc123  helm.tar.gz\n");
    }
}
