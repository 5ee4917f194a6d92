use crate::error::InstallError;
use helmup_archive::{ArchiveFormat, extract_member};
use helmup_core::{NullReporter, ProvisionError, Provisioner, Reporter, ToolSpec};
use helmup_fetch::{FetchError, FetchOptions, Fetcher, HttpClient, Progress, Sha256Digest};
use helmup_platform::exec;
use helmup_platform::platform;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BASE_URL: &str = "https://get.helm.sh";

/// Version installed when the caller pins nothing.
pub const DEFAULT_VERSION: &str = "3.16.4";

/// Spec for the machine we are running on.
pub fn host_spec(tool: &str, version: Version) -> Result<ToolSpec, helmup_platform::Error> {
    let (os, arch) = platform::host_artifact()?;
    Ok(ToolSpec::new(tool, version, os, arch))
}

type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Downloads a release artifact and stages it into `<root>/bin/<tool>`.
///
/// All intermediate files live in a temp directory inside the install root,
/// so the final move is a same-filesystem rename. Concurrent installers
/// racing on one root each stage privately and the winner's rename is the
/// one observed.
pub struct Installer<C: HttpClient> {
    fetcher: Fetcher<C>,
    install_root: PathBuf,
    base_url: String,
    reporter: Arc<dyn Reporter>,
    on_progress: Option<ProgressFn>,
}

impl<C: HttpClient> Installer<C> {
    pub fn new(client: C, install_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            install_root: install_root.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            reporter: Arc::new(NullReporter),
            on_progress: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_progress(mut self, on_progress: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    /// Deterministic location the tool binary ends up at.
    pub fn target_path(&self, spec: &ToolSpec) -> PathBuf {
        self.install_root.join("bin").join(spec.binary_name())
    }

    fn archive_format(spec: &ToolSpec) -> ArchiveFormat {
        if spec.os() == "windows" {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    fn artifact_file_name(spec: &ToolSpec) -> String {
        let format = Self::archive_format(spec);
        format!(
            "{}-v{}-{}-{}.{}",
            spec.name(),
            spec.version(),
            spec.os(),
            spec.arch(),
            format.extension()
        )
    }

    async fn sidecar_checksum(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<Option<Sha256Digest>, InstallError> {
        let sidecar = format!("{url}.sha256");
        let body = match self.fetcher.fetch_text(cancel, &sidecar).await {
            Ok(body) => body,
            Err(FetchError::Canceled) => return Err(FetchError::Canceled.into()),
            Err(err) => {
                self.reporter
                    .warn(&format!("checksum unavailable, skipping verification: {err}"));
                return Ok(None);
            }
        };

        // Sidecar layout is "<hex digest>" or "<hex digest>  <file name>".
        match body.split_whitespace().next().map(Sha256Digest::parse) {
            Some(Ok(digest)) => Ok(Some(digest)),
            _ => {
                self.reporter
                    .warn(&format!("malformed checksum at {sidecar}, skipping verification"));
                Ok(None)
            }
        }
    }

    async fn install(
        &self,
        cancel: CancellationToken,
        spec: &ToolSpec,
    ) -> Result<PathBuf, InstallError> {
        let target = self.target_path(spec);
        if exec::is_executable(&target) {
            return Ok(target);
        }

        fs::create_dir_all(&self.install_root)?;

        let file_name = Self::artifact_file_name(spec);
        let url = format!("{}/{file_name}", self.base_url.trim_end_matches('/'));
        self.reporter.info(&format!("downloading {url}"));

        let checksum = self.sidecar_checksum(&cancel, &url).await?;

        let staging = tempfile::Builder::new()
            .prefix(".helmup-install-")
            .tempdir_in(&self.install_root)?;
        let archive_path = staging.path().join(&file_name);

        let mut options = FetchOptions::new();
        if let Some(digest) = checksum {
            options = options.with_checksum(digest);
        }
        if let Some(on_progress) = &self.on_progress {
            let on_progress = Arc::clone(on_progress);
            options = options.with_progress(move |p| on_progress(p));
        }

        self.fetcher
            .download(&cancel, &url, &archive_path, &options)
            .await?;

        if cancel.is_cancelled() {
            return Err(FetchError::Canceled.into());
        }

        let format = Self::archive_format(spec);
        let member = spec.binary_name();
        let staged_binary = staging.path().join(&member);

        // tar/zip decoding is synchronous; keep it off the runtime threads.
        let task_archive = archive_path.clone();
        let task_member = member.clone();
        let task_out = staged_binary.clone();
        tokio::task::spawn_blocking(move || {
            extract_member(&task_archive, format, &task_member, &task_out)
        })
        .await??;

        exec::make_executable(&staged_binary)?;
        place(&staged_binary, &target)?;

        self.reporter
            .info(&format!("installed {} to {}", spec, target.display()));
        Ok(target)
    }
}

fn place(staged: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(staged, target) {
        Ok(()) => Ok(()),
        // A concurrent installer can win the rename on platforms where
        // replacing an existing file fails; their artifact is ours too.
        Err(err) => {
            if exec::is_executable(target) {
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

impl<C: HttpClient> Provisioner for Installer<C> {
    async fn ensure(
        &self,
        cancel: CancellationToken,
        spec: &ToolSpec,
    ) -> Result<PathBuf, ProvisionError> {
        self.install(cancel, spec).await.map_err(ProvisionError::from)
    }
}
