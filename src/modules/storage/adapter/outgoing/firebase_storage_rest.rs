//! `BlobStore` adapter for the Firebase Storage REST API.
//!
//! Objects live under a single bucket. Uploads use the simple media upload
//! and return the tokened download URL the web client would use, so the URL
//! stays valid for unauthenticated readers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::modules::storage::application::ports::outgoing::blob_store::{
    BlobStore, BlobStoreError,
};
use crate::shared::credentials::IdTokenStore;

const STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0/b";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: String,
}

pub struct FirebaseStorageRest {
    http: reqwest::Client,
    bucket: String,
    tokens: Arc<IdTokenStore>,
}

impl FirebaseStorageRest {
    pub fn new(http: reqwest::Client, bucket: String, tokens: Arc<IdTokenStore>) -> Self {
        Self {
            http,
            bucket,
            tokens,
        }
    }

    fn object_url(&self, object_path: &str) -> String {
        format!(
            "{STORAGE_BASE_URL}/{}/o/{}",
            self.bucket,
            encode_object_path(object_path)
        )
    }

    fn tokened_url(&self, object_path: &str, token: &str) -> String {
        format!("{}?alt=media&token={token}", self.object_url(object_path))
    }

    async fn fetch_metadata(&self, object_path: &str) -> Result<ObjectMetadata, BlobStoreError> {
        let mut request = self.http.get(self.object_url(object_path));
        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| BlobStoreError::Network(e.to_string()))?;
        check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| BlobStoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for FirebaseStorageRest {
    async fn upload_bytes(
        &self,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobStoreError> {
        let url = format!(
            "{STORAGE_BASE_URL}/{}/o?uploadType=media&name={}",
            self.bucket,
            encode_object_path(object_path)
        );

        let mut request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BlobStoreError::Network(e.to_string()))?;
        check_status(&response)?;

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| BlobStoreError::Backend(e.to_string()))?;
        tracing::info!(object = object_path, "blob uploaded");
        Ok(self.tokened_url(object_path, &metadata.download_tokens))
    }

    async fn download_url(&self, object_path: &str) -> Result<String, BlobStoreError> {
        let metadata = self.fetch_metadata(object_path).await?;
        Ok(self.tokened_url(object_path, &metadata.download_tokens))
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), BlobStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(BlobStoreError::PermissionDenied(status.to_string()));
    }
    Err(BlobStoreError::Backend(status.to_string()))
}

/// Object paths are a single URL segment: every byte outside the unreserved
/// set is percent-encoded, including the `/` separators.
fn encode_object_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{byte:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirebaseStorageRest {
        FirebaseStorageRest::new(
            reqwest::Client::new(),
            "demo.appspot.com".to_string(),
            Arc::new(IdTokenStore::new()),
        )
    }

    #[test]
    fn test_object_path_encoding_escapes_slashes() {
        assert_eq!(
            encode_object_path("images/profile photo.png"),
            "images%2Fprofile%20photo.png"
        );
        assert_eq!(encode_object_path("plain-name.png"), "plain-name.png");
    }

    #[test]
    fn test_tokened_url_shape() {
        let url = store().tokened_url("images/hero.png", "tok-123");
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/images%2Fhero.png?alt=media&token=tok-123"
        );
    }
}
