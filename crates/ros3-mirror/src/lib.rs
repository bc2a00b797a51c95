//! Policy-gated read mirroring for the ros3 gateway.
//!
//! This crate is the engine deciding, per request, whether to serve a read
//! from the local emulated backend or to transparently mirror it to the
//! authoritative store:
//!
//! - **Handler capability** ([`handler`]): the [`RequestHandler`] trait and
//!   the request/response value types shared by every terminal handler.
//!
//! - **Address translation** ([`address`]): converts path-style request URLs
//!   into virtual-hosted-style targets for the public AWS endpoint, or
//!   preserves the path-style form for an override endpoint.
//!
//! - **Dispatch** ([`dispatch`]): the [`MirrorDispatcher`] state machine
//!   combining method classification, allowlist evaluation, SigV4 signing,
//!   the single outbound attempt, and fallback to the local backend.
//!
//! - **Local backend** ([`local`]): the [`LocalBackendAdapter`] forwarding
//!   untouched requests to the emulated store.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> MirrorDispatcher (RequestHandler)
//!     -> classify method (writes stay local)
//!     -> translate address (bucket, key, target URL)
//!     -> AllowlistPolicy.evaluate
//!     -> sign + outbound GET (bounded by timeout)
//!        2xx  -> mirrored outcome
//!        else -> LocalBackendAdapter (RequestHandler)
//!   <- terminal outcome
//! ```

pub mod address;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod local;

pub use address::{MirrorTarget, translate};
pub use dispatch::MirrorDispatcher;
pub use error::MirrorError;
pub use handler::{BackendRequest, BackendResponse, RequestHandler};
pub use local::LocalBackendAdapter;
