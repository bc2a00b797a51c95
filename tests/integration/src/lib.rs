//! Integration tests for the ros3 gateway.
//!
//! These tests require a running gateway plus two emulated S3 backends:
//! one playing the local store the gateway fronts, one playing the real
//! authoritative store. The gateway must be started with:
//!
//! ```text
//! ROS3_LOCAL_ENDPOINT=http://localhost:4566 \
//! ROS3_OVERRIDE_ENDPOINT=http://localhost:5000 \
//! ROS3_ALLOWLIST_FILE=<file with "real-bucket-1/foo" and "real-bucket-3/foo"> \
//! ROS3_AWS_ACCESS_KEY_ID=test ROS3_AWS_SECRET_ACCESS_KEY=test \
//! ros3-gateway
//! ```
//!
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//! Run them with:
//! ```text
//! cargo test -p ros3-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL of the gateway under test.
fn gateway_endpoint() -> String {
    std::env::var("ROS3_GATEWAY_ENDPOINT").unwrap_or_else(|_| "http://localhost:2000".to_owned())
}

/// Endpoint URL of the authoritative store the gateway mirrors from.
fn real_endpoint() -> String {
    std::env::var("ROS3_REAL_ENDPOINT").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Create an S3 client for the given endpoint.
fn client_for(endpoint: String) -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Create a configured S3 client pointing at the gateway.
#[must_use]
pub fn gateway_client() -> aws_sdk_s3::Client {
    client_for(gateway_endpoint())
}

/// Create a configured S3 client pointing at the authoritative store.
#[must_use]
pub fn real_client() -> aws_sdk_s3::Client {
    client_for(real_endpoint())
}

/// Seed the authoritative store with the fixture buckets and objects the
/// mirror tests read, and create the local twin of `real-bucket-3`.
///
/// Idempotent: re-creating existing buckets and re-putting objects is fine
/// against the emulators used in CI.
pub async fn populate_real_store() {
    let real = real_client();
    for bucket in ["real-bucket-1", "real-bucket-2", "real-bucket-3"] {
        let _ = real.create_bucket().bucket(bucket).send().await;
    }

    let fixtures = [
        ("real-bucket-1", "foo/bar/hellogoodbye.txt", "hello goodbye"),
        ("real-bucket-1", "kux/foo/hello.txt", "hello"),
        ("real-bucket-1", "foo/kux/hello.txt", "hello"),
        ("real-bucket-2", "foo/bar/goodbye.txt", "goodbye"),
        ("real-bucket-3", "kux/hello.txt", "hello"),
        ("real-bucket-3", "foo/bar/goodbye.txt", "goodbye"),
    ];
    for (bucket, key, body) in fixtures {
        real.put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from_static(
                body.as_bytes(),
            ))
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to seed {bucket}/{key}: {e}"));
    }

    // The listing tests need the bucket to exist locally so the fallback
    // path has something to answer with.
    let gateway = gateway_client();
    let _ = gateway.create_bucket().bucket("real-bucket-3").send().await;
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

mod test_mirror;
mod test_passthrough;
