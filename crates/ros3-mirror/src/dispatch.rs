//! The mirror dispatcher: classification, policy check, and fallback.
//!
//! [`MirrorDispatcher`] wraps a local [`RequestHandler`] and decides, per
//! request, whether to serve from the authoritative store instead:
//!
//! ```text
//! Received
//!   -> method not GET/HEAD            -> local backend
//!   -> not addressable (no bucket)    -> local backend
//!   -> denied by allowlist            -> local backend
//!   -> translate, sign, outbound GET
//!        2xx                          -> mirrored outcome (headers empty)
//!        anything else                -> warn, local backend
//! ```
//!
//! Mirroring is a pure override: every failure on the mirror path is
//! swallowed and replaced by whatever the local backend produces, so a
//! denied or failed mirror is indistinguishable from a gateway running
//! with mirroring disabled. Errors from the local backend itself propagate
//! verbatim. The dispatcher keeps no per-request state and is safe to share
//! across workers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method};
use tracing::{debug, warn};

use ros3_auth::{CredentialProvider, region_from_host, sign_request_now};
use ros3_core::AllowlistPolicy;

use crate::address::{MirrorTarget, query_pairs, translate};
use crate::error::MirrorError;
use crate::handler::{BackendRequest, BackendResponse, RequestHandler};

/// The policy-gated mirroring dispatcher.
///
/// Holds only immutable shared state; cloning is cheap and every clone
/// serves requests independently.
#[derive(Clone)]
pub struct MirrorDispatcher {
    policy: Arc<AllowlistPolicy>,
    override_endpoint: Option<String>,
    credentials: Arc<dyn CredentialProvider>,
    default_region: String,
    client: reqwest::Client,
    local: Arc<dyn RequestHandler>,
}

impl std::fmt::Debug for MirrorDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorDispatcher")
            .field("policy", &self.policy)
            .field("override_endpoint", &self.override_endpoint)
            .field("default_region", &self.default_region)
            .finish_non_exhaustive()
    }
}

impl MirrorDispatcher {
    /// Create a dispatcher in front of `local`.
    ///
    /// The outbound client is bounded by `timeout` so a slow authoritative
    /// endpoint cannot exhaust local serving capacity.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Transport`] when the outbound HTTP client
    /// cannot be constructed.
    pub fn new(
        policy: Arc<AllowlistPolicy>,
        override_endpoint: Option<String>,
        credentials: Arc<dyn CredentialProvider>,
        default_region: String,
        timeout: Duration,
        local: Arc<dyn RequestHandler>,
    ) -> Result<Self, MirrorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MirrorError::Transport)?;

        Ok(Self {
            policy,
            override_endpoint,
            credentials,
            default_region,
            client,
            local,
        })
    }

    /// Perform one mirror attempt: sign and issue the outbound call.
    ///
    /// The outbound call is always a GET regardless of the inbound method,
    /// so no mutating verb can ever reach the authoritative store. There is
    /// exactly one attempt: no retries, no backoff.
    async fn attempt_mirror(
        &self,
        req: &BackendRequest,
        target: &MirrorTarget,
    ) -> Result<BackendResponse, MirrorError> {
        let credentials = self.credentials.resolve()?;
        let region = target
            .target_uri
            .host()
            .and_then(region_from_host)
            .unwrap_or_else(|| self.default_region.clone());

        let signed = sign_request_now(
            &credentials,
            &region,
            &Method::GET,
            &target.target_uri,
            &req.body,
        )?;

        debug!(
            bucket = %target.bucket,
            key = %target.object_path,
            target = %target.target_uri,
            %region,
            "attempting mirrored read"
        );

        let response = self
            .client
            .get(target.target_uri.to_string())
            .headers(signed)
            .body(req.body.clone())
            .send()
            .await
            .map_err(MirrorError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::UpstreamStatus(status));
        }

        let body = response.bytes().await.map_err(MirrorError::Transport)?;

        // Headers from the authoritative store are not propagated.
        Ok(BackendResponse::new(status, HeaderMap::new(), body))
    }

    async fn dispatch(self, req: BackendRequest) -> Result<BackendResponse, MirrorError> {
        // Only reads are ever mirrored; writes always stay local.
        if req.method != Method::GET && req.method != Method::HEAD {
            return self.local.handle(req).await;
        }

        let target = match translate(&req.uri, self.override_endpoint.as_deref()) {
            Ok(target) => target,
            Err(err) => {
                debug!(uri = %req.uri, error = %err, "request not addressable, serving locally");
                return self.local.handle(req).await;
            }
        };

        let query = query_pairs(&req.uri);
        if !self
            .policy
            .evaluate(&target.bucket, &target.object_path, &query)
        {
            debug!(
                bucket = %target.bucket,
                key = %target.object_path,
                "mirroring denied by allowlist, serving locally"
            );
            return self.local.handle(req).await;
        }

        match self.attempt_mirror(&req, &target).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(
                    bucket = %target.bucket,
                    key = %target.object_path,
                    error = %err,
                    "mirror attempt failed, serving locally"
                );
                self.local.handle(req).await
            }
        }
    }
}

impl RequestHandler for MirrorDispatcher {
    fn handle(
        &self,
        req: BackendRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BackendResponse, MirrorError>> + Send>> {
        let dispatcher = self.clone();
        Box::pin(dispatcher.dispatch(req))
    }
}
