//! Gateway configuration.
//!
//! Provides [`Ros3Config`] for configuring the ros3 mirroring gateway.
//! Configuration values are loaded once from environment variables at process
//! start and are read-only thereafter; there is no reload without restart.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Gateway configuration.
///
/// All fields have defaults suitable for local development. Configuration
/// can be loaded from environment variables via [`Ros3Config::from_env`].
///
/// # Examples
///
/// ```
/// use ros3_core::config::Ros3Config;
///
/// let config = Ros3Config::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:2000");
/// assert!(config.override_endpoint.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Ros3Config {
    /// Bind address for the gateway (e.g. `"0.0.0.0:2000"`).
    #[builder(default = String::from("0.0.0.0:2000"))]
    pub gateway_listen: String,

    /// Endpoint of the local emulated backend that serves non-mirrored traffic.
    #[builder(default = String::from("http://127.0.0.1:4566"))]
    pub local_endpoint: String,

    /// Optional endpoint that replaces the public AWS endpoint for mirrored
    /// calls. When set, the original path-style request form is preserved.
    #[builder(default)]
    pub override_endpoint: Option<String>,

    /// Path to the allowlist file. Absent means open mode: every bucket and
    /// key is eligible for mirroring.
    #[builder(default)]
    pub allowlist_file: Option<String>,

    /// Default signing region, used when none can be inferred from the
    /// target host.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Timeout in seconds for the outbound mirrored call.
    #[builder(default = 10)]
    pub mirror_timeout_secs: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for Ros3Config {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:2000"),
            local_endpoint: String::from("http://127.0.0.1:4566"),
            override_endpoint: None,
            allowlist_file: None,
            default_region: String::from("us-east-1"),
            mirror_timeout_secs: 10,
            log_level: String::from("info"),
        }
    }
}

impl Ros3Config {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:2000` |
    /// | `ROS3_LOCAL_ENDPOINT` | `http://127.0.0.1:4566` |
    /// | `ROS3_OVERRIDE_ENDPOINT` | *(unset)* |
    /// | `ROS3_ALLOWLIST_FILE` | *(unset)* |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `ROS3_MIRROR_TIMEOUT_SECS` | `10` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Examples
    ///
    /// ```
    /// use ros3_core::config::Ros3Config;
    ///
    /// let config = Ros3Config::from_env();
    /// assert!(!config.gateway_listen.is_empty());
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("ROS3_LOCAL_ENDPOINT") {
            config.local_endpoint = v;
        }
        if let Ok(v) = std::env::var("ROS3_OVERRIDE_ENDPOINT") {
            config.override_endpoint = Some(v);
        }
        if let Ok(v) = std::env::var("ROS3_ALLOWLIST_FILE") {
            config.allowlist_file = Some(v);
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("ROS3_MIRROR_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.mirror_timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
