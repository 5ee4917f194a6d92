//! Probe-then-provision resolution.

use crate::error::ResolveError;
use crate::provision::{ProvisionError, Provisioner};
use crate::report::Reporter;
use crate::spec::ToolSpec;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Look up `tool` through the host's executable search mechanism.
///
/// `None` means "not installed" and is the expected trigger for
/// provisioning, not an error.
pub fn probe(tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
}

/// Like [`probe`], but against an explicit `PATH`-style list.
pub fn probe_in(tool: &str, search_path: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which_in(tool, Some(search_path), Path::new(".")).ok()
}

/// Fallback stage: ask the provisioner for the tool described by `spec`.
///
/// Provisioning failures come back wrapped with the tool name; a canceled
/// token short-circuits before the provisioner is ever invoked and is kept
/// distinct from installation failure.
pub async fn ensure_provisioned<P: Provisioner>(
    cancel: CancellationToken,
    spec: &ToolSpec,
    provisioner: &P,
) -> Result<PathBuf, ResolveError> {
    let tool = spec.name();

    if cancel.is_cancelled() {
        return Err(ResolveError::Canceled {
            tool: tool.to_string(),
        });
    }

    match provisioner.ensure(cancel, spec).await {
        Ok(path) => Ok(path),
        Err(ProvisionError::Canceled) => Err(ResolveError::Canceled {
            tool: tool.to_string(),
        }),
        Err(err) => Err(ResolveError::Install {
            tool: tool.to_string(),
            source: err,
        }),
    }
}

/// Resolves a usable binary path for one tool: host lookup first, a
/// [`Provisioner`] only on a miss.
pub struct Resolver<'a, P> {
    spec: &'a ToolSpec,
    provisioner: &'a P,
    reporter: &'a dyn Reporter,
    search_path: Option<OsString>,
}

impl<'a, P: Provisioner> Resolver<'a, P> {
    pub fn new(spec: &'a ToolSpec, provisioner: &'a P, reporter: &'a dyn Reporter) -> Self {
        Self {
            spec,
            provisioner,
            reporter,
            search_path: None,
        }
    }

    /// Restrict the probe to an explicit search path instead of the
    /// process environment.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Return a path that is invocable right now.
    ///
    /// A probe hit returns immediately and never touches the provisioner.
    /// On a miss the provisioner runs exactly once; its failure comes back
    /// wrapped with the tool name, cancellation comes back as its own
    /// variant. No retries at this layer.
    pub async fn resolve(&self, cancel: CancellationToken) -> Result<PathBuf, ResolveError> {
        let tool = self.spec.name();

        let found = match &self.search_path {
            Some(paths) => probe_in(tool, paths),
            None => probe(tool),
        };
        if let Some(path) = found {
            return Ok(path);
        }

        self.reporter.info(&format!(
            "{tool} is not installed on this machine, installing {}",
            self.spec
        ));

        ensure_provisioned(cancel, self.spec, self.provisioner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use semver::Version;
    use std::fs;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SpyProvisioner<F> {
        calls: AtomicUsize,
        seen: Mutex<Vec<ToolSpec>>,
        respond: F,
    }

    impl<F> SpyProvisioner<F>
    where
        F: Fn() -> Result<PathBuf, ProvisionError> + Send + Sync,
    {
        fn new(respond: F) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                respond,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl<F> Provisioner for SpyProvisioner<F>
    where
        F: Fn() -> Result<PathBuf, ProvisionError> + Send + Sync,
    {
        fn ensure(
            &self,
            _cancel: CancellationToken,
            spec: &ToolSpec,
        ) -> impl Future<Output = Result<PathBuf, ProvisionError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(spec.clone());
            let result = (self.respond)();
            async move { result }
        }
    }

    fn helm_spec() -> ToolSpec {
        ToolSpec::new("helm", Version::new(3, 16, 4), "linux", "amd64")
    }

    fn binary_name(tool: &str) -> String {
        if cfg!(windows) {
            format!("{tool}.exe")
        } else {
            tool.to_string()
        }
    }

    fn place_binary(dir: &Path, tool: &str) -> PathBuf {
        let path = dir.join(binary_name(tool));
        fs::write(&path, b"").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn probe_empty_name_is_a_miss() {
        assert!(probe("").is_none());
    }

    #[test]
    fn probe_in_misses_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_in("helm", dir.path()).is_none());
    }

    #[tokio::test]
    async fn probe_hit_skips_provisioning() {
        let dir = tempfile::tempdir().unwrap();
        let installed = place_binary(dir.path(), "helm");

        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| -> Result<PathBuf, ProvisionError> {
            panic!("must not provision")
        });
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let path = resolver.resolve(CancellationToken::new()).await.unwrap();
        assert_eq!(path, installed);
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn probe_miss_provisions_exactly_once() {
        let dir = tempfile::tempdir().unwrap();

        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| Ok(PathBuf::from("/opt/helmup/bin/helm")));
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let path = resolver.resolve(CancellationToken::new()).await.unwrap();
        assert_eq!(path, PathBuf::from("/opt/helmup/bin/helm"));
        assert_eq!(spy.calls(), 1);
        assert_eq!(spy.seen.lock().unwrap()[0], spec);
    }

    #[tokio::test]
    async fn provisioner_failure_is_wrapped_with_the_tool_name() {
        let dir = tempfile::tempdir().unwrap();

        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| {
            Err(ProvisionError::failed(io::Error::other(
                "network unreachable",
            )))
        });
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let err = resolver.resolve(CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "error while installing helm: network unreachable"
        );
        assert!(!err.is_canceled());
    }

    #[tokio::test]
    async fn cancellation_short_circuits_before_provisioning() {
        let dir = tempfile::tempdir().unwrap();

        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| -> Result<PathBuf, ProvisionError> {
            panic!("must not provision after cancel")
        });
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolver.resolve(cancel).await.unwrap_err();
        assert!(err.is_canceled());
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn canceled_provisioner_surfaces_as_canceled() {
        let dir = tempfile::tempdir().unwrap();

        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| Err(ProvisionError::Canceled));
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let err = resolver.resolve(CancellationToken::new()).await.unwrap_err();
        assert!(err.is_canceled());
    }

    #[tokio::test]
    async fn fallback_alone_wraps_the_underlying_failure() {
        let spec = helm_spec();
        let spy = SpyProvisioner::new(|| {
            Err(ProvisionError::failed(io::Error::other("disk full")))
        });

        let err = ensure_provisioned(CancellationToken::new(), &spec, &spy)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "error while installing helm: disk full");
    }

    #[tokio::test]
    async fn second_resolve_takes_the_fast_path_after_install() {
        let dir = tempfile::tempdir().unwrap();
        let bin_dir = dir.path().to_path_buf();

        let spec = helm_spec();
        // Install into the probed directory, like a real provisioner would
        // install into a directory the caller then puts on PATH.
        let spy = SpyProvisioner::new(move || Ok(place_binary(&bin_dir, "helm")));
        let resolver = Resolver::new(&spec, &spy, &NullReporter).with_search_path(dir.path());

        let first = resolver.resolve(CancellationToken::new()).await.unwrap();
        assert_eq!(spy.calls(), 1);

        let second = resolver.resolve(CancellationToken::new()).await.unwrap();
        assert_eq!(spy.calls(), 1);
        assert_eq!(first, second);
    }
}
