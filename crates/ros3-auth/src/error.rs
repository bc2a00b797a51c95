//! Error types for SigV4 signing.
//!
//! All signing failures are represented by [`AuthError`]. On the mirror path
//! every one of these is recoverable: the dispatcher logs it and falls back
//! to the local backend.

/// Errors that can occur while producing a SigV4-signed request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required credential environment variable is missing or empty.
    #[error("missing credentials: {0} is not set")]
    MissingCredentials(String),

    /// The target URL has no host component to sign.
    #[error("target URL has no host: {0}")]
    MissingHost(String),

    /// A produced header value is not a valid HTTP header value.
    #[error("invalid header value for {0}")]
    InvalidHeaderValue(String),
}
