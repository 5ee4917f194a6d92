//! Effective settings: CLI flags over `HELMUP_HOME`/config file over defaults.

use anyhow::Context;
use helmup_install::{DEFAULT_BASE_URL, DEFAULT_VERSION};
use helmup_platform::dir;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Keys accepted in `<install root>/config.toml`. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    home: Option<PathBuf>,
    version: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub home: PathBuf,
    pub version: String,
    pub base_url: String,
}

impl Settings {
    /// Resolve settings for this invocation.
    ///
    /// The config file is looked up under the default root (env override
    /// included) so that `--home` can still be redirected by it; explicit
    /// flags always win.
    pub fn load(
        home_flag: Option<PathBuf>,
        version_flag: Option<String>,
        base_url_flag: Option<String>,
    ) -> anyhow::Result<Self> {
        let default_root = dir::install_root()
            .context("cannot determine an install root; set HELMUP_HOME")?;

        let config_path = default_root.join("config.toml");
        let file = match fs::read_to_string(&config_path) {
            Ok(raw) => toml::from_str(&raw)
                .with_context(|| format!("invalid config at {}", config_path.display()))?,
            Err(_) => FileConfig::default(),
        };

        Ok(Self::from_parts(
            home_flag,
            version_flag,
            base_url_flag,
            file,
            default_root,
        ))
    }

    fn from_parts(
        home_flag: Option<PathBuf>,
        version_flag: Option<String>,
        base_url_flag: Option<String>,
        file: FileConfig,
        default_root: PathBuf,
    ) -> Self {
        Self {
            home: home_flag.or(file.home).unwrap_or(default_root),
            version: version_flag
                .or(file.version)
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            base_url: base_url_flag
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}
