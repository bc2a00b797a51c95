//! Core configuration and allowlist policy for the ros3 mirroring gateway.
//!
//! This crate provides the foundational building blocks shared across the
//! gateway: the process-wide [`Ros3Config`] loaded once at startup, the
//! [`AllowlistPolicy`] deciding which reads may be mirrored to the
//! authoritative store, and the common error type.

pub mod allowlist;
pub mod config;
pub mod error;

pub use allowlist::{AllowlistEntry, AllowlistPolicy};
pub use config::Ros3Config;
pub use error::{Ros3Error, Ros3Result};
