/// HTTP backend for the external media service
use crate::{
    config::MediaConfig,
    error::{ApiError, ApiResult},
    media_store::{MediaAsset, MediaBackend},
};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Talks to the media service's upload endpoint with multipart POSTs
pub struct HttpMediaBackend {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl HttpMediaBackend {
    pub fn new(config: &MediaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl MediaBackend for HttpMediaBackend {
    async fn upload(&self, local_path: &Path) -> ApiResult<MediaAsset> {
        let data = tokio::fs::read(local_path).await?;

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::MediaStorage(format!("upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::MediaStorage(format!(
                "media service returned {}",
                response.status()
            )));
        }

        response
            .json::<MediaAsset>()
            .await
            .map_err(|e| ApiError::MediaStorage(format!("unexpected upload response: {}", e)))
    }
}
