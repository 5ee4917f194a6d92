//! Resolution of an external tool dependency.
//!
//! Callers ask for a usable binary path; the host `PATH` is probed first and
//! a [`Provisioner`] is consulted only on a miss. Every call re-probes, so a
//! returned path is valid at the moment of return and nothing is cached here.

pub use error::ResolveError;
pub use provision::{ProvisionError, Provisioner};
pub use report::{NullReporter, Reporter};
pub use resolve::{Resolver, ensure_provisioned, probe, probe_in};
pub use spec::ToolSpec;

mod error;
mod provision;
mod report;
mod resolve;
mod spec;
