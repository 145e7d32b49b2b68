//! Listing and download integration tests.
//!
//! Run with: `cargo test -p dropgo-api --test files_test`

mod helpers;

use helpers::fixtures::{write_data, write_raw_sidecar, write_sidecar, write_upload};
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "OK");

    let ready = app.client().get("/health/ready").await;
    assert_eq!(ready.status_code(), 200);
    assert_eq!(ready.json::<Value>()["storage"], "ready");
}

#[tokio::test]
async fn test_empty_directory_lists_nothing() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/files").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn test_listing_contains_only_complete_uploads() {
    let app = setup_test_app().await;
    write_upload(
        app.root(),
        "a1",
        b"0123456789",
        &[("filename", "digits.txt"), ("filetype", "text/plain"), ("relativePath", "docs/digits.txt")],
    );
    write_sidecar(app.root(), "b2", 100, &[("filename", "big.bin")]);
    write_data(app.root(), "b2", &[0u8; 40]);

    let response = app.client().get("/api/files").await;
    assert_eq!(response.status_code(), 200);

    let listed = response.json::<Value>();
    assert_eq!(
        listed,
        serde_json::json!([{
            "id": "a1",
            "name": "digits.txt",
            "size": 10,
            "mimeType": "text/plain",
            "relativePath": "docs/digits.txt",
            "completed": true
        }])
    );
}

#[tokio::test]
async fn test_listing_survives_corrupt_and_orphaned_entries() {
    let app = setup_test_app().await;
    write_upload(app.root(), "ok", b"abc", &[]);
    write_raw_sidecar(app.root(), "corrupt", "{\"ID\": \"corrupt\", \"Size\": ");
    write_data(app.root(), "corrupt", b"abc");
    write_sidecar(app.root(), "orphan", 3, &[]);
    write_data(app.root(), "stray", b"no sidecar");

    let listed = app.client().get("/api/files").await.json::<Value>();
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["ok"]);
    assert_eq!(listed[0]["name"], "ok");
    assert_eq!(listed[0]["mimeType"], "application/octet-stream");
    assert_eq!(listed[0]["relativePath"], "");
}

#[tokio::test]
async fn test_listing_observes_growth() {
    let app = setup_test_app().await;
    write_sidecar(app.root(), "g", 8, &[]);
    write_data(app.root(), "g", b"0123");

    let before = app.client().get("/api/files").await.json::<Value>();
    assert_eq!(before, serde_json::json!([]));

    write_data(app.root(), "g", b"01234567");
    let after = app.client().get("/api/files").await.json::<Value>();
    assert_eq!(after[0]["id"], "g");
    assert_eq!(after[0]["size"], 8);
}

#[tokio::test]
async fn test_download_complete_upload() {
    let app = setup_test_app().await;
    write_upload(
        app.root(),
        "a1",
        b"0123456789",
        &[("filename", "digits.txt"), ("filetype", "text/plain")],
    );

    let response = app.client().get("/api/files/a1").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"0123456789");

    let headers = response.headers();
    assert_eq!(headers.get("content-length").unwrap(), "10");
    assert_eq!(headers.get("content-type").unwrap(), "text/plain");
    assert_eq!(
        headers.get("content-disposition").unwrap(),
        "attachment; filename=\"digits.txt\"; filename*=UTF-8''digits.txt"
    );
    assert_eq!(headers.get("cache-control").unwrap(), "no-cache");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("accept-ranges").is_none());
    assert!(headers.get("x-request-id").is_some());
}

#[tokio::test]
async fn test_download_falls_back_to_id_and_octet_stream() {
    let app = setup_test_app().await;
    write_raw_sidecar(app.root(), "plain", r#"{"ID":"plain","Size":2,"Offset":2,"MetaData":null}"#);
    write_data(app.root(), "plain", b"hi");

    let response = app.client().get("/api/files/plain").await;
    assert_eq!(response.status_code(), 200);
    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "application/octet-stream");
    assert_eq!(
        headers.get("content-disposition").unwrap(),
        "attachment; filename=\"plain\"; filename*=UTF-8''plain"
    );
}

#[tokio::test]
async fn test_download_incomplete_upload_is_distinct() {
    let app = setup_test_app().await;
    write_sidecar(app.root(), "b2", 100, &[]);
    write_data(app.root(), "b2", &[0u8; 40]);

    let response = app.client().get("/api/files/b2").await;
    assert_eq!(response.status_code(), 400);

    let body = response.json::<Value>();
    assert_eq!(body["code"], "UPLOAD_INCOMPLETE");
    assert_eq!(body["recoverable"], true);
    assert_eq!(body["error"], "File upload not complete");
}

#[tokio::test]
async fn test_download_unknown_upload_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/files/missing").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_download_malformed_sidecar_is_not_found() {
    let app = setup_test_app().await;
    write_raw_sidecar(app.root(), "m", "not json");
    write_data(app.root(), "m", b"x");

    let response = app.client().get("/api/files/m").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");

    let streamed = app.client().get("/api/stream/m").await;
    assert_eq!(streamed.status_code(), 404);
}

#[tokio::test]
async fn test_missing_id_is_bad_request() {
    let app = setup_test_app().await;

    for response in [
        app.client().get("/api/files/").await,
        app.client().delete("/api/files/").await,
        app.client().get("/api/stream/").await,
    ] {
        assert_eq!(response.status_code(), 400);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["error"], "File ID required");
    }
}

#[tokio::test]
async fn test_sidecar_name_as_id_is_rejected() {
    let app = setup_test_app().await;
    write_upload(app.root(), "a1", b"abc", &[]);

    let response = app.client().get("/api/files/a1.info").await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let doc = response.json::<Value>();
    assert!(doc["paths"]["/api/stream/{id}"].is_object());
}
