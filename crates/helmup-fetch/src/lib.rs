//! HTTP downloading for provisioned tools.
//!
//! Single-pass: the payload is hashed while it streams into a staging file
//! next to the destination, verified against an optional sha256 digest, then
//! renamed into place so a half-written download can never be observed at
//! the final path. Cancellation is raced against every await.

pub use client::{BoxStream, HttpClient, ReqwestClient};
pub use data::{FetchOptions, FetchPhase, InvalidDigest, Progress, Sha256Digest};
pub use error::FetchError;
pub use fetcher::Fetcher;

mod client;
mod data;
mod error;
mod fetcher;
