//! Path-style to virtual-hosted-style address translation.
//!
//! Inbound requests use path-style addressing (`/bucket/key`). The public
//! AWS endpoint expects virtual-hosted-style addressing
//! (`https://bucket.s3.amazonaws.com/key`), so mirrored calls are rewritten.
//! When an override endpoint is configured the original path-style form is
//! preserved: the rewrite only applies against the public endpoint.

use http::Uri;

use crate::error::MirrorError;

/// The public S3 endpoint suffix used when no override endpoint is set.
const AWS_S3_SUFFIX: &str = "s3.amazonaws.com";

/// A translated mirror target.
#[derive(Debug, Clone)]
pub struct MirrorTarget {
    /// The bucket, taken from the first path segment.
    pub bucket: String,
    /// The key portion of the path, with a leading `/` (`"/"` when absent).
    pub object_path: String,
    /// The full outbound URL for the mirrored call.
    pub target_uri: Uri,
}

/// Translate a path-style request URI into a mirror target.
///
/// The path is split on `/` with empty segments discarded; the first
/// segment is the bucket and the rest, rejoined, form the object path. The
/// query string is re-parsed as a multi-valued mapping (blank values
/// preserved) and re-serialized with repeated keys.
///
/// # Errors
///
/// Returns [`MirrorError::Address`] when the path has no bucket segment or
/// the rebuilt URL is invalid.
pub fn translate(uri: &Uri, override_endpoint: Option<&str>) -> Result<MirrorTarget, MirrorError> {
    let mut segments = uri.path().split('/').filter(|s| !s.is_empty());
    let bucket = segments
        .next()
        .ok_or_else(|| MirrorError::Address(format!("no bucket in path {:?}", uri.path())))?
        .to_owned();

    let remainder = segments.collect::<Vec<_>>().join("/");
    let object_path = format!("/{remainder}");

    let query = match uri.query() {
        Some(q) if !q.is_empty() => format!("?{}", reserialize_query(q)),
        _ => String::new(),
    };

    let target = match override_endpoint {
        // Override endpoints receive the original path-style form.
        Some(endpoint) => format!("{}{}{query}", endpoint.trim_end_matches('/'), uri.path()),
        None => format!("https://{bucket}.{AWS_S3_SUFFIX}{object_path}{query}"),
    };

    let target_uri = target
        .parse::<Uri>()
        .map_err(|e| MirrorError::Address(format!("invalid mirror target {target:?}: {e}")))?;

    Ok(MirrorTarget {
        bucket,
        object_path,
        target_uri,
    })
}

/// Parse a request's query string into decoded key/value pairs.
///
/// Repeated keys produce repeated pairs and blank values are preserved,
/// matching the multi-valued mapping the allowlist and the translator
/// operate on.
#[must_use]
pub fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    uri.query().map_or_else(Vec::new, |q| {
        form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    })
}

/// Re-serialize a query string from its multi-valued pairs.
fn reserialize_query(query: &str) -> String {
    let pairs = form_urlencoded::parse(query.as_bytes());
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
