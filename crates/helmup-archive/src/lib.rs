//! Extraction of tool release archives.
//!
//! Only the two formats helm ships are understood: gzipped tarballs for
//! Unix-likes and zip for Windows. Extraction pulls a single named member
//! out of the archive; entry paths are validated so a hostile archive
//! cannot write outside the destination.

pub use error::ArchiveError;
pub use extract::extract_member;
pub use format::ArchiveFormat;

mod error;
mod extract;
mod format;
