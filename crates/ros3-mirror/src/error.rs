//! Error types for the mirroring engine.
//!
//! Every variant except [`MirrorError::Local`] is recoverable on the mirror
//! path: the dispatcher logs it and falls back to the local backend, so the
//! caller never observes it. `Local` errors come from the passthrough path
//! and propagate verbatim.

use ros3_auth::AuthError;

/// Errors produced while mirroring a request or reaching the local backend.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The request URL cannot be translated to a mirror target.
    #[error("request is not addressable for mirroring: {0}")]
    Address(String),

    /// Signing the outbound call failed (e.g. missing credentials).
    #[error(transparent)]
    Signing(#[from] AuthError),

    /// The outbound call failed at the transport level (DNS, connect,
    /// timeout).
    #[error("outbound mirror call failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The authoritative store answered with a non-2xx status.
    #[error("authoritative store returned {0}")]
    UpstreamStatus(http::StatusCode),

    /// The local backend could not be reached.
    #[error("local backend call failed: {0}")]
    Local(#[source] reqwest::Error),
}
