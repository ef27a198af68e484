//! Object storage client (bucket/object REST API with public URLs).

use std::time::Duration;

use configs::StorageConfig;
use reqwest::{header, Client};
use tracing::instrument;

use super::BackendError;

pub struct StorageClient {
    url: String,
    key: String,
    http: Client,
}

impl StorageClient {
    pub fn new(cfg: &StorageConfig) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { url: cfg.url.trim_end_matches('/').to_string(), key: cfg.key.clone(), http })
    }

    fn object_url(&self, bucket: &str, object: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.url, bucket, object)
    }

    /// Upload `bytes` as `bucket/object`. An existing object is not replaced.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, bucket: &str, object: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BackendError> {
        let resp = self
            .http
            .post(self.object_url(bucket, object))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }

    /// Publicly resolvable URL of an object in a public bucket.
    pub fn public_url(&self, bucket: &str, object: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.url, bucket, object)
    }
}
