//! The provisioning side of helmup: fetch the right release artifact for
//! the host, unpack the binary, and place it under the install root.

pub use error::InstallError;
pub use installer::{DEFAULT_BASE_URL, DEFAULT_VERSION, Installer, host_spec};

mod error;
mod installer;
