//! Error type shared by all protocol operations.

use thiserror::Error;

/// Failures surfaced by the protocol core.
///
/// Errors are always returned to the immediate caller. The core never
/// retries and never continues in a degraded mode; a failed operation
/// leaves the party state exactly as it was before the call.
#[derive(Error, Debug)]
pub enum Error {
    /// A public parameter or signature is malformed.
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// A caller deviated from the protocol (unknown coordinate, missing or
    /// duplicated broadcast entry, repeated correlation, length mismatch).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// An operation was invoked on a node that is not in the right state
    /// to serve it.
    #[error("invalid state: {0}")]
    State(String),

    /// The operating system entropy source could not be read.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
