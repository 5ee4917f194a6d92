//! Resolution entry point shared by the commands: a usable helm binary path,
//! installing helm on the fly when the host has none.

use crate::config::Settings;
use crate::ui::DownloadTracker;
use anyhow::Context;
use helmup_core::{Reporter, Resolver};
use helmup_fetch::ReqwestClient;
use helmup_install::{Installer, host_spec};
use semver::Version;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn helm_binary_path(
    cancel: CancellationToken,
    reporter: Arc<dyn Reporter>,
    settings: &Settings,
) -> anyhow::Result<PathBuf> {
    let version = Version::parse(&settings.version)
        .with_context(|| format!("invalid helm version {:?}", settings.version))?;
    let spec = host_spec("helm", version)?;

    let tracker = DownloadTracker::new();
    let installer = Installer::new(ReqwestClient::new(), &settings.home)
        .with_base_url(&settings.base_url)
        .with_reporter(Arc::clone(&reporter))
        .with_progress(move |progress| tracker.update(progress));

    let resolver = Resolver::new(&spec, &installer, reporter.as_ref());
    Ok(resolver.resolve(cancel).await?)
}

/// Token that trips on the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}
