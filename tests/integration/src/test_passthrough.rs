//! Passthrough integration tests.
//!
//! Writes never leave the local store, and reads of purely local data work
//! exactly as they would against the emulator directly.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{gateway_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_create_bucket_and_round_trip_object_locally() {
        let client = gateway_client();
        let bucket = test_bucket_name("local");

        client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("create_bucket");

        client
            .put_object()
            .bucket(&bucket)
            .key("foo/bar/goodbye.txt")
            .body(ByteStream::from_static(b"goodbye"))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("foo/bar/goodbye.txt")
            .send()
            .await
            .expect("get_object");
        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"goodbye");
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_report_missing_local_object() {
        let client = gateway_client();
        let bucket = test_bucket_name("missing");

        client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("create_bucket");

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("never/written.txt")
            .send()
            .await
            .expect_err("object does not exist");
        assert!(err.into_service_error().is_no_such_key());
    }

    #[tokio::test]
    #[ignore = "requires running gateway and backends"]
    async fn test_should_delete_object_locally() {
        let client = gateway_client();
        let bucket = test_bucket_name("delete");

        client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("create_bucket");
        client
            .put_object()
            .bucket(&bucket)
            .key("victim.txt")
            .body(ByteStream::from_static(b"x"))
            .send()
            .await
            .expect("put_object");

        client
            .delete_object()
            .bucket(&bucket)
            .key("victim.txt")
            .send()
            .await
            .expect("delete_object");

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("victim.txt")
            .send()
            .await
            .expect_err("object was deleted");
        assert!(err.into_service_error().is_no_such_key());
    }
}
