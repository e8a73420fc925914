/// Media store client
///
/// Uploads staged files to the external media service and returns stable
/// URLs. The service also reports video duration. Nothing is transcoded or
/// stored locally beyond the staging file, which is always removed after
/// the upload attempt.

mod http;

pub use http::HttpMediaBackend;

use crate::{
    config::MediaConfig,
    error::{ApiError, ApiResult},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;

/// What the media service hands back for an uploaded file
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    /// Only present for video uploads
    pub duration: Option<f64>,
}

/// Backend seam so tests can run without the external service
#[async_trait]
pub trait MediaBackend: Send + Sync {
    async fn upload(&self, local_path: &Path) -> ApiResult<MediaAsset>;
}

/// Media store manager
#[derive(Clone)]
pub struct MediaStore {
    backend: Arc<dyn MediaBackend>,
    temp_dir: PathBuf,
}

impl MediaStore {
    pub fn new(config: &MediaConfig, temp_dir: PathBuf) -> Self {
        Self {
            backend: Arc::new(HttpMediaBackend::new(config)),
            temp_dir,
        }
    }

    #[cfg(test)]
    pub fn with_backend(backend: Arc<dyn MediaBackend>, temp_dir: PathBuf) -> Self {
        Self { backend, temp_dir }
    }

    /// Write multipart bytes to the staging area, preserving the original
    /// extension so the media service can sniff the type
    pub async fn stage(&self, file_name: &str, data: &[u8]) -> ApiResult<PathBuf> {
        fs::create_dir_all(&self.temp_dir).await?;

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let staged = self
            .temp_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        fs::write(&staged, data).await?;

        Ok(staged)
    }

    /// Upload a staged file
    ///
    /// The staging file is deleted after the attempt on every exit path;
    /// a failed upload surfaces as a `MediaStorage` error with no file
    /// left behind.
    pub async fn upload(&self, local_path: &Path) -> ApiResult<MediaAsset> {
        let result = self.backend.upload(local_path).await;

        if let Err(e) = fs::remove_file(local_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = ?local_path, "failed to remove staged file: {}", e);
            }
        }

        result
    }

    /// Stage and upload in one step
    pub async fn stage_and_upload(&self, file_name: &str, data: &[u8]) -> ApiResult<MediaAsset> {
        if data.is_empty() {
            return Err(ApiError::Validation("Uploaded file is empty".to_string()));
        }

        let staged = self.stage(file_name, data).await?;
        self.upload(&staged).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend {
        fail: bool,
    }

    #[async_trait]
    impl MediaBackend for FixedBackend {
        async fn upload(&self, _local_path: &Path) -> ApiResult<MediaAsset> {
            if self.fail {
                Err(ApiError::MediaStorage("upstream said no".to_string()))
            } else {
                Ok(MediaAsset {
                    url: "https://media.example/asset".to_string(),
                    duration: Some(12.5),
                })
            }
        }
    }

    fn store(fail: bool, dir: &Path) -> MediaStore {
        MediaStore::with_backend(Arc::new(FixedBackend { fail }), dir.to_path_buf())
    }

    #[tokio::test]
    async fn staged_file_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(false, dir.path());

        let staged = store.stage("clip.mp4", b"data").await.unwrap();
        assert!(staged.exists());

        let asset = store.upload(&staged).await.unwrap();
        assert_eq!(asset.url, "https://media.example/asset");
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn staged_file_removed_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(true, dir.path());

        let staged = store.stage("clip.mp4", b"data").await.unwrap();
        let result = store.upload(&staged).await;

        assert!(matches!(result, Err(ApiError::MediaStorage(_))));
        // Cleanup happens on the failure path too
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(false, dir.path());

        let result = store.stage_and_upload("clip.mp4", b"").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn staging_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(false, dir.path());

        let staged = store.stage("thumb.jpeg", b"data").await.unwrap();
        assert_eq!(staged.extension().and_then(|e| e.to_str()), Some("jpeg"));
    }
}
