// ABOUTME: Supabase storage REST backend for progress photos
// ABOUTME: Uploads with the service role key and returns the bucket's public object URL

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use super::ObjectStore;
use crate::config::SupabaseConfig;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "Object storage";

#[derive(Debug, Deserialize)]
struct StorageError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Supabase storage bucket
#[derive(Clone)]
pub struct SupabaseObjectStore {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl Debug for SupabaseObjectStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SupabaseObjectStore")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SupabaseObjectStore {
    /// Create a store for one bucket of a Supabase project
    #[must_use]
    pub fn new(client: Client, config: &SupabaseConfig, bucket: impl Into<String>) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.service_role_key.clone(),
            bucket: bucket.into(),
        }
    }

    fn encoded_key(key: &str) -> String {
        key.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            Self::encoded_key(key)
        )
    }

    /// Public URL of an object in the bucket
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            Self::encoded_key(key)
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<String> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.upload_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StorageError>(&body)
                .ok()
                .and_then(|e| e.message.or(e.error))
                .unwrap_or(body);
            error!(status = %status, bucket = %self.bucket, "Photo upload rejected");
            return Err(AppError::storage(format!("Upload failed ({status}): {message}")));
        }

        debug!(key, size, "Uploaded object to Supabase storage");
        Ok(self.public_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_encode_each_segment() {
        let config = SupabaseConfig {
            url: "https://project.supabase.co".to_owned(),
            service_role_key: "key".to_owned(),
        };
        let store = SupabaseObjectStore::new(Client::new(), &config, "progress-photos");
        assert_eq!(
            store.public_url("user-1/17_a b.png"),
            "https://project.supabase.co/storage/v1/object/public/progress-photos/user-1/17_a%20b.png"
        );
        assert_eq!(
            store.upload_url("user-1/17_a.png"),
            "https://project.supabase.co/storage/v1/object/progress-photos/user-1/17_a.png"
        );
    }
}
