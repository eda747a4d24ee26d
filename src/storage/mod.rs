// ABOUTME: Object storage for progress photos behind the ObjectStore contract
// ABOUTME: Builds object keys and provides Supabase storage and local filesystem backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progress Photo Storage
//!
//! Photos are written to an external object store; only the returned public
//! URL is recorded in the progress log. Keys have the shape
//! `<user_id>/<unix_millis>_<sanitized filename>`.

mod local;
mod supabase;

pub use local::LocalObjectStore;
pub use supabase::SupabaseObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::constants::storage::MAX_FILENAME_CHARS;
use crate::errors::AppResult;

/// Object store contract
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend identifier used in logs
    fn name(&self) -> &'static str;

    /// Store `bytes` under `key` and return the object's public URL
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write is rejected, or an external
    /// service error when a remote store cannot be reached
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<String>;
}

/// Object key for a new progress photo
#[must_use]
pub fn photo_key(user_id: &str, filename: &str) -> String {
    format!(
        "{user_id}/{}_{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(filename)
    )
}

/// Reduce a client-supplied filename to a safe single path segment
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are dropped so the result can never be `.` or `..`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .skip_while(|c| *c == '.')
        .take(MAX_FILENAME_CHARS)
        .collect();

    if cleaned.is_empty() {
        "upload".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\me now.JPG"), "me_now.JPG");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("progrès.png"), "progr_s.png");
    }

    #[test]
    fn test_photo_key_is_scoped_to_user() {
        let key = photo_key("user-1", "front.png");
        let (user, rest) = key.split_once('/').unwrap_or_default();
        assert_eq!(user, "user-1");
        let (millis, name) = rest.split_once('_').unwrap_or_default();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "front.png");
    }
}
