//! Bucket/prefix allowlist policy for mirrored reads.
//!
//! The allowlist decides which read requests may be mirrored to the
//! authoritative store. Rules are loaded once at startup from a plain-text
//! file, one rule per line:
//!
//! ```text
//! real-bucket-1/foo
//! real-bucket-2
//! ```
//!
//! A line without `/` grants access to the whole bucket. Matching is
//! case-sensitive prefix matching on the object key (or, for listing
//! requests, on the `prefix` query parameter); there is no globbing and no
//! normalization beyond stripping a leading slash.

use std::path::Path;

use crate::error::{Ros3Error, Ros3Result};

/// A single allowlist rule permitting mirrored access to a bucket, optionally
/// restricted to keys under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistEntry {
    /// The bucket this rule applies to.
    pub bucket: String,
    /// Key prefix within the bucket. Empty matches the entire bucket.
    pub key_prefix: String,
}

impl AllowlistEntry {
    /// Create an entry granting access to keys under `key_prefix` in `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_prefix: key_prefix.into(),
        }
    }

    /// Create an entry granting access to the whole bucket.
    #[must_use]
    pub fn whole_bucket(bucket: impl Into<String>) -> Self {
        Self::new(bucket, "")
    }
}

/// The mirroring access policy.
///
/// `entries == None` is open mode: every bucket and key is eligible for
/// mirroring. Once constructed the policy never mutates, so it is shared
/// across request workers without synchronization.
#[derive(Debug, Clone)]
pub struct AllowlistPolicy {
    entries: Option<Vec<AllowlistEntry>>,
}

impl AllowlistPolicy {
    /// Create an open-mode policy that permits every bucket and key.
    #[must_use]
    pub fn open() -> Self {
        Self { entries: None }
    }

    /// Create a policy from an explicit set of rules.
    #[must_use]
    pub fn from_entries(entries: Vec<AllowlistEntry>) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    /// Parse a policy from allowlist file contents.
    ///
    /// One rule per line, `bucket` or `bucket/keyPrefix`. Blank lines are
    /// skipped. A rule with an empty bucket is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`Ros3Error::InvalidAllowlist`] naming the offending line.
    pub fn from_lines(contents: &str) -> Ros3Result<Self> {
        let mut entries = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (bucket, key_prefix) = match line.split_once('/') {
                Some((bucket, prefix)) => (bucket, prefix),
                None => (line, ""),
            };

            if bucket.is_empty() {
                return Err(Ros3Error::InvalidAllowlist {
                    line: idx + 1,
                    reason: format!("missing bucket name in {raw:?}"),
                });
            }

            entries.push(AllowlistEntry::new(bucket, key_prefix));
        }

        Ok(Self::from_entries(entries))
    }

    /// Load a policy from an allowlist file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Ros3Error::Config`] if the file cannot be read, or
    /// [`Ros3Error::InvalidAllowlist`] for a malformed rule. Both are fatal
    /// at startup.
    pub fn load(path: impl AsRef<Path>) -> Ros3Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Ros3Error::Config(format!("cannot read allowlist file {}: {e}", path.display()))
        })?;
        let policy = Self::from_lines(&contents)?;
        tracing::info!(
            path = %path.display(),
            rules = policy.entries.as_ref().map_or(0, Vec::len),
            "loaded mirroring allowlist"
        );
        Ok(policy)
    }

    /// Whether this policy is in open mode (no allowlist configured).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.entries.is_none()
    }

    /// Decide whether a read against `bucket` may be mirrored.
    ///
    /// For listing requests the match target is the value of the `prefix`
    /// query parameter; otherwise it is `object_path` (the key portion of the
    /// request URL). A rule matches when, after stripping any leading `/`
    /// from both sides, the target starts with the rule's key prefix. An
    /// empty prefix always matches. Returns true iff at least one rule for
    /// the bucket matches; a bucket with no rules is never mirrored.
    #[must_use]
    pub fn evaluate(&self, bucket: &str, object_path: &str, query: &[(String, String)]) -> bool {
        let Some(entries) = &self.entries else {
            return true;
        };

        let target = query
            .iter()
            .find(|(k, _)| k == "prefix")
            .map_or(object_path, |(_, v)| v.as_str());
        let target = target.strip_prefix('/').unwrap_or(target);

        entries
            .iter()
            .filter(|e| e.bucket == bucket)
            .any(|e| {
                let prefix = e.key_prefix.strip_prefix('/').unwrap_or(e.key_prefix.as_str());
                target.starts_with(prefix)
            })
    }
}
