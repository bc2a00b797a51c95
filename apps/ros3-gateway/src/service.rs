//! The gateway's hyper service.
//!
//! [`GatewayService`] adapts the [`RequestHandler`] capability to hyper:
//!
//! 1. Health check interception (`GET /_ros3/health`)
//! 2. Request body collection
//! 3. Handler invocation (the mirror dispatcher in production)
//! 4. Error response formatting and common response headers

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error};
use uuid::Uuid;

use ros3_mirror::{BackendRequest, RequestHandler};

/// Hyper service wrapping a [`RequestHandler`].
pub struct GatewayService {
    handler: Arc<dyn RequestHandler>,
}

impl GatewayService {
    /// Create a service dispatching to `handler`.
    #[must_use]
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }
}

impl Clone for GatewayService {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl std::fmt::Debug for GatewayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayService").finish_non_exhaustive()
    }
}

impl Service<http::Request<Incoming>> for GatewayService {
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, handler.as_ref(), &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through the gateway pipeline.
async fn process_request(
    req: http::Request<Incoming>,
    handler: &dyn RequestHandler,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return text_response(
                http::StatusCode::BAD_REQUEST,
                "failed to read request body",
            );
        }
    };

    let backend_req = BackendRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    };

    match handler.handle(backend_req).await {
        Ok(outcome) => {
            let mut response = http::Response::new(Full::new(outcome.body));
            *response.status_mut() = outcome.status;
            *response.headers_mut() = outcome.headers;
            response
        }
        Err(err) => {
            error!(error = %err, request_id, "backend request failed");
            text_response(http::StatusCode::BAD_GATEWAY, "upstream backend unavailable")
        }
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_ros3/health" || path == "/_health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"status":"running","service":"ros3"}"#,
        )))
        .expect("static health response should be valid")
}

/// Produce a plain-text response with the given status.
fn text_response(status: http::StatusCode, message: &'static str) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .expect("static text response should be valid")
}

/// Add common response headers to every gateway response.
fn add_common_headers(
    mut response: http::Response<Full<Bytes>>,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv);
    }

    headers.insert(
        "Server",
        http::header::HeaderValue::from_static("Ros3Gateway"),
    );

    response
}
