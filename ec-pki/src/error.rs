//! Error types for the crate.

use thiserror::Error;

/// Errors surfaced by the bootstrap operations.
///
/// None of these are retryable; every failure is terminal for the step
/// that produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// The system entropy source failed during key generation.
    #[error("random source failure: {0}")]
    RandomSource(#[source] rcgen::Error),

    /// Certificate construction or signing failed.
    #[error("signing failure: {0}")]
    Signing(#[source] rcgen::Error),

    /// DER marshaling or parsing produced or met malformed bytes.
    #[error("encoding failure: {0}")]
    Encoding(String),

    /// A certificate did not verify against the expected key.
    #[error("verification failure: {0}")]
    Verification(String),

    /// A PEM artifact could not be written to disk.
    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
