//! Error definitions for the mapping module

use thiserror::Error;

/// Errors while turning mapping candidates into bindings
#[derive(Debug, Error)]
pub enum MappingError {
    /// The candidate misses the keys every candidate carries
    #[error("Malformed candidate: {0}")]
    MalformedCandidate(String),

    /// The expected device names an engine but no device identity
    #[error("Invalid expected device: {0}")]
    InvalidExpectedDevice(String),

    /// The candidate kind cannot be bound to the target
    #[error("Unsupported binding: {0}")]
    UnsupportedBinding(String),
}
