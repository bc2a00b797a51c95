//! Mirror-path integration tests.
//!
//! These exercise the allowlist gate end-to-end: allowlisted reads come
//! back with the authoritative store's content, everything else behaves as
//! if mirroring were disabled.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::error::ProvideErrorMetadata;

    use crate::{gateway_client, populate_real_store};

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_mirror_allowlisted_get_object() {
        populate_real_store().await;
        let client = gateway_client();

        let resp = client
            .get_object()
            .bucket("real-bucket-1")
            .key("foo/bar/hellogoodbye.txt")
            .send()
            .await
            .expect("mirrored get_object");

        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"hello goodbye");
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_fall_back_for_key_outside_allowlisted_prefix() {
        populate_real_store().await;
        let client = gateway_client();

        // The key exists remotely under kux/, but only foo/ is allowlisted;
        // the local store has never heard of the bucket.
        let err = client
            .get_object()
            .bucket("real-bucket-1")
            .key("kux/foo/hello.txt")
            .send()
            .await
            .expect_err("must be served by the local store");

        let code = err.into_service_error().meta().code().map(ToOwned::to_owned);
        assert!(
            matches!(code.as_deref(), Some("NoSuchKey" | "NoSuchBucket")),
            "unexpected error code: {code:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_fall_back_for_bucket_not_in_allowlist() {
        populate_real_store().await;
        let client = gateway_client();

        let err = client
            .get_object()
            .bucket("real-bucket-2")
            .key("foo/bar/goodbye.txt")
            .send()
            .await
            .expect_err("bucket is not allowlisted");
        let code = err.into_service_error().meta().code().map(ToOwned::to_owned);
        assert_eq!(code.as_deref(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_mirror_allowlisted_listing() {
        populate_real_store().await;
        let client = gateway_client();

        let resp = client
            .list_objects_v2()
            .bucket("real-bucket-1")
            .prefix("foo")
            .send()
            .await
            .expect("mirrored listing");

        let keys: Vec<&str> = resp.contents().iter().filter_map(|o| o.key()).collect();
        assert!(keys.contains(&"foo/bar/hellogoodbye.txt"));
        assert!(keys.contains(&"foo/kux/hello.txt"));
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_list_locally_for_prefix_outside_allowlist() {
        populate_real_store().await;
        let client = gateway_client();

        // real-bucket-3 exists locally but the kux/ keys only exist
        // remotely; the denied listing must come back empty.
        let resp = client
            .list_objects_v2()
            .bucket("real-bucket-3")
            .prefix("kux")
            .send()
            .await
            .expect("local listing");
        assert!(resp.contents().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_mirror_head_object() {
        populate_real_store().await;
        let client = gateway_client();

        // A 2xx is all the mirror path guarantees for HEAD: upstream
        // headers are not propagated.
        client
            .head_object()
            .bucket("real-bucket-1")
            .key("foo/bar/hellogoodbye.txt")
            .send()
            .await
            .expect("mirrored head_object");
    }
}
