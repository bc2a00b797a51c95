//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Unlike a verifying server, a signer controls both the canonical form and
//! the bytes on the wire, so the normalization here only has to agree with
//! what the outbound call actually sends.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// The set of characters that must be percent-encoded in URI path segments.
///
/// Per AWS SigV4 spec, all characters except unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) must be encoded.
/// Forward slashes in the path are preserved (not encoded).
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// The result is a newline-separated string of:
/// 1. HTTP method
/// 2. Canonical URI
/// 3. Canonical query string
/// 4. Canonical headers (terminated by an extra newline)
/// 5. Signed headers
/// 6. Hashed payload
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> String {
    let canonical_uri = build_canonical_uri(uri);
    let canonical_query = build_canonical_query_string(query_string);
    let canonical_headers = build_canonical_headers(headers);
    let signed_headers_str = signed_headers_string(headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers_str}\n{payload_hash}"
    )
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes (`/`) are preserved. Empty paths are normalized to `/`.
/// Segments are decoded first so a path that arrives percent-encoded from
/// the inbound request produces the same canonical form as a raw one.
///
/// # Examples
///
/// ```
/// use ros3_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test.txt"), "/test.txt");
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/hello world"), "/hello%20world");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    let encoded_segments: Vec<String> = path
        .split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect();

    encoded_segments.join("/")
}

/// Build the canonical query string by sorting parameters.
///
/// Parameters are sorted by key name first, then by value for duplicate
/// keys. Values are kept exactly as they appear in the query string being
/// sent: the signer serialized that query itself, so the wire encoding and
/// the canonical encoding are the same bytes.
///
/// # Examples
///
/// ```
/// use ros3_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1"), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| param.split_once('=').unwrap_or((param, "")))
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers string from the headers being signed.
///
/// Header names are lowercased, values are trimmed and internal whitespace
/// runs collapsed to a single space, and entries are sorted by name. Every
/// header passed in is part of the signature.
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)]) -> String {
    let header_map: BTreeMap<String, String> = headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), collapse_whitespace(value.trim())))
        .collect();

    header_map
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the signed headers list: lowercase names, sorted, `;`-separated.
///
/// # Examples
///
/// ```
/// use ros3_auth::canonical::signed_headers_string;
///
/// assert_eq!(
///     signed_headers_string(&[("X-Amz-Date", "x"), ("Host", "h")]),
///     "host;x-amz-date"
/// );
/// ```
#[must_use]
pub fn signed_headers_string(headers: &[(&str, &str)]) -> String {
    let mut names: Vec<String> = headers.iter().map(|(n, _)| n.to_lowercase()).collect();
    names.sort_unstable();
    names.join(";")
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
