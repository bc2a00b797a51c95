//! The request handler capability shared by the dispatcher and the local
//! backend.
//!
//! [`RequestHandler`] is the boundary between the gateway's HTTP layer and
//! anything that can terminate a request: the
//! [`LocalBackendAdapter`](crate::local::LocalBackendAdapter) forwards to
//! the emulated store, and the
//! [`MirrorDispatcher`](crate::dispatch::MirrorDispatcher) wraps another
//! handler and adds the mirror path in front of it. The trait uses
//! boxed-future methods so handlers compose behind `Arc<dyn RequestHandler>`.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};

use crate::error::MirrorError;

/// One incoming request, as seen by a handler.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// The HTTP method of the inbound call.
    pub method: Method,
    /// The full request URI in path-style form (`/bucket/key?query`).
    pub uri: Uri,
    /// The inbound headers.
    pub headers: HeaderMap,
    /// The collected request body.
    pub body: Bytes,
}

/// A terminal outcome for a request.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    /// The response status code.
    pub status: StatusCode,
    /// Response headers. Empty on the mirror path: headers from the
    /// authoritative store are not propagated to the caller.
    pub headers: HeaderMap,
    /// The response body.
    pub body: Bytes,
}

impl BackendResponse {
    /// Create a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// A capability that can terminate a request.
///
/// Implementations must be safe to invoke concurrently from any number of
/// server workers; the gateway shares them as `Arc<dyn RequestHandler>`
/// with no locking.
pub trait RequestHandler: Send + Sync + 'static {
    /// Handle a request and produce its terminal outcome.
    ///
    /// An `Err` from this method is surfaced to the caller; recoverable
    /// conditions (like a failed mirror attempt) must be resolved inside
    /// the handler.
    fn handle(
        &self,
        req: BackendRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BackendResponse, MirrorError>> + Send>>;
}
