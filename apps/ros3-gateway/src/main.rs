//! ros3 Gateway - read-only mirroring front for an emulated S3 backend.
//!
//! This binary fronts a local S3 emulator and transparently serves
//! allowlisted reads from the real authoritative store instead. Writes and
//! everything the allowlist denies pass through to the emulator untouched.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:2000 ROS3_ALLOWLIST_FILE=allowlist ros3-gateway
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:2000` | Bind address |
//! | `ROS3_LOCAL_ENDPOINT` | `http://127.0.0.1:4566` | Emulated backend |
//! | `ROS3_OVERRIDE_ENDPOINT` | *(unset)* | Replaces the public AWS endpoint |
//! | `ROS3_ALLOWLIST_FILE` | *(unset)* | Allowlist path; absent = open mode |
//! | `ROS3_AWS_ACCESS_KEY_ID` | *(unset)* | Mirror signing access key |
//! | `ROS3_AWS_SECRET_ACCESS_KEY` | *(unset)* | Mirror signing secret key |
//! | `ROS3_AWS_SESSION_TOKEN` | *(unset)* | Optional STS session token |
//! | `DEFAULT_REGION` | `us-east-1` | Signing region fallback |
//! | `ROS3_MIRROR_TIMEOUT_SECS` | `10` | Outbound call timeout |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ros3_auth::EnvCredentialProvider;
use ros3_core::{AllowlistPolicy, Ros3Config};
use ros3_mirror::{LocalBackendAdapter, MirrorDispatcher};

use crate::service::GatewayService;

/// Gateway version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Load the allowlist policy named by the configuration.
///
/// A malformed allowlist file is fatal; a missing configuration means open
/// mode.
fn load_policy(config: &Ros3Config) -> Result<AllowlistPolicy> {
    match &config.allowlist_file {
        Some(path) => {
            AllowlistPolicy::load(path).with_context(|| format!("loading allowlist from {path}"))
        }
        None => {
            info!("no allowlist configured, every bucket is eligible for mirroring");
            Ok(AllowlistPolicy::open())
        }
    }
}

/// Wire the dispatcher in front of the local backend adapter.
fn build_dispatcher(config: &Ros3Config, policy: AllowlistPolicy) -> Result<MirrorDispatcher> {
    let local = Arc::new(LocalBackendAdapter::new(config.local_endpoint.clone()));

    MirrorDispatcher::new(
        Arc::new(policy),
        config.override_endpoint.clone(),
        Arc::new(EnvCredentialProvider),
        config.default_region.clone(),
        Duration::from_secs(config.mirror_timeout_secs),
        local,
    )
    .context("building mirror dispatcher")
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: GatewayService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Ros3Config::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        local_endpoint = %config.local_endpoint,
        override_endpoint = ?config.override_endpoint,
        allowlist_file = ?config.allowlist_file,
        default_region = %config.default_region,
        mirror_timeout_secs = config.mirror_timeout_secs,
        version = VERSION,
        "starting ros3 gateway",
    );

    let policy = load_policy(&config)?;
    let dispatcher = build_dispatcher(&config, policy)?;
    let service = GatewayService::new(Arc::new(dispatcher));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
