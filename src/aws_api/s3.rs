use crate::services::BlobStore;
use async_trait::async_trait;
use aws_sdk_s3::types::ByteStream;
use tracing::{debug, instrument};

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStore for S3Store {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), anyhow::Error> {
        let _ = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await?;
        debug!("uploaded object");

        Ok(())
    }
}
