//! Region inference from S3 hostnames.
//!
//! AWS encodes the region in its S3 endpoint hostnames in two forms:
//! dotted (`s3.eu-west-2.amazonaws.com`) and dashed
//! (`s3-us-west-1.amazonaws.com`), with an optional bucket label in front
//! for virtual-hosted-style addressing. The legacy global endpoint
//! (`s3.amazonaws.com`) carries no region at all.

/// Infer the AWS region from an S3 endpoint hostname.
///
/// Handles `s3.{region}.` and `s3-{region}.` host labels, with or without a
/// leading bucket label, and ignores any port suffix. Returns `None` when
/// the hostname does not encode a region, letting the caller fall back to a
/// configured default.
///
/// # Examples
///
/// ```
/// use ros3_auth::region::region_from_host;
///
/// assert_eq!(
///     region_from_host("mybucket.s3.eu-west-2.amazonaws.com"),
///     Some("eu-west-2".to_owned())
/// );
/// assert_eq!(region_from_host("s3.amazonaws.com"), None);
/// ```
#[must_use]
pub fn region_from_host(host: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();

    for (i, label) in labels.iter().enumerate() {
        if *label == "s3" {
            // Dotted form: the label after "s3" is the region, unless this
            // is the legacy global endpoint (s3.amazonaws.com).
            return match labels.get(i + 1) {
                Some(&"amazonaws") | None => None,
                Some(region) => Some((*region).to_owned()),
            };
        }
        if let Some(region) = label.strip_prefix("s3-") {
            // Dashed legacy form: s3-us-west-1.amazonaws.com.
            if region.is_empty() {
                return None;
            }
            return Some(region.to_owned());
        }
    }

    None
}
