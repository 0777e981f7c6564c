use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum BlobStoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Outgoing port for binary uploads (profile images, project screenshots).
/// Uploading returns a public download URL that can be stored straight into
/// a content document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload_bytes(
        &self,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobStoreError>;

    async fn download_url(&self, object_path: &str) -> Result<String, BlobStoreError>;
}
