//! Error types for the ros3 core.

/// Core error type for ros3 infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum Ros3Error {
    /// A line in the allowlist file could not be parsed.
    #[error("invalid allowlist rule at line {line}: {reason}")]
    InvalidAllowlist {
        /// 1-based line number of the offending rule.
        line: usize,
        /// What made the rule unparseable.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for ros3 operations.
pub type Ros3Result<T> = Result<T, Ros3Error>;
