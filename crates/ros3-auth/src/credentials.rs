//! Credential provider trait and implementations.
//!
//! This module defines the [`CredentialProvider`] trait for resolving the
//! credentials used to sign outbound mirrored calls, along with an
//! environment-backed provider and a static one for tests. Secret material
//! is never logged: the [`Credentials`] `Debug` impl redacts everything but
//! the access key id.

use crate::error::AuthError;

/// Credentials for signing outbound requests.
///
/// Ephemeral: resolved per signing attempt, never persisted.
#[derive(Clone)]
pub struct Credentials {
    /// The access key id, included verbatim in the `Authorization` header.
    pub access_key_id: String,
    /// The secret access key seeding the signing key derivation.
    pub secret_access_key: String,
    /// Optional STS session token, sent as `x-amz-security-token`.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create credentials from the given components.
    #[must_use]
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Trait for resolving signing credentials.
///
/// Implementations may back this with environment variables, an instance
/// metadata service, or any other credential source.
pub trait CredentialProvider: Send + Sync {
    /// Resolve the current credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] when no credentials are
    /// available.
    fn resolve(&self) -> Result<Credentials, AuthError>;
}

/// Environment variable names read by [`EnvCredentialProvider`].
const ENV_ACCESS_KEY_ID: &str = "ROS3_AWS_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "ROS3_AWS_SECRET_ACCESS_KEY";
const ENV_SESSION_TOKEN: &str = "ROS3_AWS_SESSION_TOKEN";

/// Credential provider backed by `ROS3_AWS_*` environment variables.
///
/// The variables are read on every [`resolve`](CredentialProvider::resolve)
/// call, so rotated credentials take effect without restarting the process.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn resolve(&self) -> Result<Credentials, AuthError> {
        let access_key_id = non_empty_env(ENV_ACCESS_KEY_ID)?;
        let secret_access_key = non_empty_env(ENV_SECRET_ACCESS_KEY)?;
        let session_token = std::env::var(ENV_SESSION_TOKEN)
            .ok()
            .filter(|v| !v.is_empty());

        Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            session_token,
        ))
    }
}

fn non_empty_env(name: &str) -> Result<String, AuthError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::MissingCredentials(name.to_owned()))
}

/// A credential provider returning a fixed set of credentials.
///
/// Suitable for tests and development.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    /// Create a provider that always resolves to `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn resolve(&self) -> Result<Credentials, AuthError> {
        Ok(self.credentials.clone())
    }
}
