// ABOUTME: Integration tests for locally stored progress photos
// ABOUTME: An uploaded photo is written to disk and served back under the public photo route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    create_test_database, test_config, test_generator, ScriptedLlm, StaticIdentityProvider,
    ALICE_TOKEN,
};
use helpers::axum_test::AxumTestRequest;
use nutristrong_server::resources::ServerResources;
use nutristrong_server::server::build_app;
use nutristrong_server::storage::LocalObjectStore;
use serde_json::Value;
use tempfile::TempDir;

#[tokio::test]
async fn test_uploaded_photo_is_served_back() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config();
    config.storage.local_dir = dir.path().to_path_buf();
    config.storage.public_base_url = "http://localhost/photos".to_owned();

    let photos = Arc::new(LocalObjectStore::new(
        &config.storage.local_dir,
        &config.storage.public_base_url,
    ));
    let resources = Arc::new(ServerResources::new(
        create_test_database().await,
        test_generator(ScriptedLlm::replying_with_plan()),
        StaticIdentityProvider::new(),
        photos,
    ));

    let body: Value = AxumTestRequest::post("/api/progress/photo")
        .bearer(ALICE_TOKEN)
        .multipart_file("file", "front.png", "image/png", b"png bytes")
        .send(build_app(&resources, &config))
        .await
        .assert_status(StatusCode::OK)
        .json();

    let url = body["data"]["url"].as_str().unwrap();
    let path = url.trim_start_matches("http://localhost");
    assert!(path.starts_with("/photos/user-alice/"));

    let key = path.trim_start_matches("/photos/");
    assert_eq!(std::fs::read(dir.path().join(key)).unwrap(), b"png bytes");

    let served = AxumTestRequest::get(path)
        .send(build_app(&resources, &config))
        .await
        .assert_status(StatusCode::OK)
        .text();
    assert_eq!(served, "png bytes");
}
