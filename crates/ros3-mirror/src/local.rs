//! Adapter for the local emulated backend.
//!
//! The emulated store is an external collaborator reached over HTTP. The
//! adapter forwards the original request to it unchanged (path, query,
//! method, headers, body) and returns its native response as the terminal
//! outcome, including any S3 error payloads it produces.

use std::future::Future;
use std::pin::Pin;

use http::header::{CONNECTION, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use tracing::debug;

use crate::error::MirrorError;
use crate::handler::{BackendRequest, BackendResponse, RequestHandler};

/// Forwards requests to the emulated backend's HTTP endpoint.
#[derive(Debug, Clone)]
pub struct LocalBackendAdapter {
    endpoint: String,
    client: reqwest::Client,
}

impl LocalBackendAdapter {
    /// Create an adapter forwarding to `endpoint` (e.g. `http://127.0.0.1:4566`).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl RequestHandler for LocalBackendAdapter {
    fn handle(
        &self,
        req: BackendRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BackendResponse, MirrorError>> + Send>> {
        let base = self.endpoint.trim_end_matches('/').to_owned();
        let client = self.client.clone();

        Box::pin(async move {
            let url = match req.uri.query() {
                Some(q) => format!("{base}{}?{q}", req.uri.path()),
                None => format!("{base}{}", req.uri.path()),
            };

            debug!(method = %req.method, %url, "forwarding to local backend");

            // The client derives Host from the target URL and recomputes
            // framing from the collected body.
            let mut headers = req.headers;
            headers.remove(HOST);
            headers.remove(CONTENT_LENGTH);
            headers.remove(TRANSFER_ENCODING);

            let response = client
                .request(req.method, &url)
                .headers(headers)
                .body(req.body)
                .send()
                .await
                .map_err(MirrorError::Local)?;

            let status = response.status();
            let mut headers = response.headers().clone();
            // Hop-by-hop headers do not survive the proxy hop.
            headers.remove(CONNECTION);
            headers.remove(TRANSFER_ENCODING);
            let body = response.bytes().await.map_err(MirrorError::Local)?;

            Ok(BackendResponse::new(status, headers, body))
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode, Uri};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a single canned HTTP response and return the request head that
    /// was received.
    async fn spawn_one_shot_server(
        response: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 8192];
            let mut head = Vec::new();
            loop {
                let n = stream.read(&mut buf).await.expect("read");
                head.extend_from_slice(&buf[..n]);
                if n == 0 || head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            stream.shutdown().await.ok();
            tx.send(String::from_utf8_lossy(&head).into_owned()).ok();
        });

        (format!("http://{addr}"), rx)
    }

    #[tokio::test]
    async fn test_should_forward_request_and_return_native_response() {
        let (endpoint, rx) = spawn_one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\nhello",
        )
        .await;

        let adapter = LocalBackendAdapter::new(endpoint);
        let req = BackendRequest {
            method: Method::GET,
            uri: "/bucket/key.txt?prefix=foo".parse::<Uri>().expect("uri"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };

        let resp = adapter.handle(req).await.expect("local response");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body.as_ref(), b"hello");
        assert_eq!(
            resp.headers.get("content-type").and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );

        let head = rx.await.expect("request head");
        assert!(head.starts_with("GET /bucket/key.txt?prefix=foo HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_should_preserve_method_and_error_status() {
        let (endpoint, rx) = spawn_one_shot_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let adapter = LocalBackendAdapter::new(endpoint);
        let req = BackendRequest {
            method: Method::DELETE,
            uri: "/bucket/missing".parse::<Uri>().expect("uri"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };

        let resp = adapter.handle(req).await.expect("local response");
        assert_eq!(resp.status, StatusCode::NOT_FOUND);

        let head = rx.await.expect("request head");
        assert!(head.starts_with("DELETE /bucket/missing HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_should_surface_transport_failure_as_local_error() {
        // Nothing listens here; the connection is refused.
        let adapter = LocalBackendAdapter::new("http://127.0.0.1:1");
        let req = BackendRequest {
            method: Method::GET,
            uri: "/bucket/key".parse::<Uri>().expect("uri"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };

        let err = adapter.handle(req).await.unwrap_err();
        assert!(matches!(err, MirrorError::Local(_)));
    }
}
