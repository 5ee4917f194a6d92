use semver::Version;
use std::fmt;

/// Descriptor of the exact artifact a provisioner should make available.
///
/// Opaque to the resolver itself; only the name matters for probing. The
/// version and platform pair select the release artifact on install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    name: String,
    version: Version,
    os: String,
    arch: String,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        os: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// File name the tool's binary carries on the spec's platform.
    pub fn binary_name(&self) -> String {
        if self.os == "windows" {
            format!("{}.exe", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} ({}-{})",
            self.name, self.version, self.os, self.arch
        )
    }
}
