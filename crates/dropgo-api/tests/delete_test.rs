//! Deletion integration tests.
//!
//! Run with: `cargo test -p dropgo-api --test delete_test`

mod helpers;

use helpers::fixtures::{write_data, write_sidecar, write_upload};
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_delete_removes_both_files() {
    let app = setup_test_app().await;
    write_upload(app.root(), "a1", b"0123456789", &[]);

    let response = app.client().delete("/api/files/a1").await;
    assert_eq!(response.status_code(), 204);
    assert!(response.as_bytes().is_empty());

    assert!(!app.root().join("a1").exists());
    assert!(!app.root().join("a1.info").exists());

    let listed = app.client().get("/api/files").await.json::<Value>();
    assert_eq!(listed, serde_json::json!([]));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let app = setup_test_app().await;
    write_upload(app.root(), "a1", b"abc", &[]);

    assert_eq!(app.client().delete("/api/files/a1").await.status_code(), 204);

    let again = app.client().delete("/api/files/a1").await;
    assert_eq!(again.status_code(), 404);
    assert_eq!(again.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_incomplete_upload() {
    let app = setup_test_app().await;
    write_sidecar(app.root(), "b2", 100, &[]);
    write_data(app.root(), "b2", &[0u8; 40]);

    assert_eq!(app.client().delete("/api/files/b2").await.status_code(), 204);
    assert!(!app.root().join("b2").exists());
    assert!(!app.root().join("b2.info").exists());
}

#[tokio::test]
async fn test_delete_without_sidecar() {
    let app = setup_test_app().await;
    write_data(app.root(), "stray", b"abc");

    assert_eq!(app.client().delete("/api/files/stray").await.status_code(), 204);
    assert!(!app.root().join("stray").exists());
}

#[tokio::test]
async fn test_delete_without_data_leaves_sidecar() {
    let app = setup_test_app().await;
    write_sidecar(app.root(), "ghost", 3, &[]);

    assert_eq!(app.client().delete("/api/files/ghost").await.status_code(), 404);
    assert!(app.root().join("ghost.info").exists());
}

#[tokio::test]
async fn test_delete_rejects_traversal() {
    let app = setup_test_app().await;

    // A file next to the upload root that a traversal would reach.
    let victim = app.root().join("..").join("victim.txt");
    std::fs::write(&victim, b"keep me").unwrap();

    for path in ["/api/files/..%2Fvictim.txt", "/api/files/a%5Cb", "/api/files/x..y"] {
        let response = app.client().delete(path).await;
        assert_eq!(response.status_code(), 400, "path {}", path);
        assert_eq!(response.json::<Value>()["code"], "INVALID_IDENTIFIER");
    }

    assert!(victim.exists());
    std::fs::remove_file(victim).unwrap();
}

#[tokio::test]
async fn test_delete_racing_stream_does_not_crash() {
    let app = setup_test_app().await;
    let data: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    write_upload(app.root(), "race", &data, &[]);

    let client = app.client();
    let (streamed, deleted) = tokio::join!(
        async { client.get("/api/stream/race").await },
        async { client.delete("/api/files/race").await },
    );

    assert_eq!(deleted.status_code(), 204);
    // Either the stream won and carries every byte, or the delete won first.
    match streamed.status_code().as_u16() {
        200 => assert_eq!(streamed.as_bytes().as_ref(), data.as_slice()),
        404 => {}
        other => panic!("unexpected stream status {}", other),
    }

    // The server keeps serving afterwards.
    assert_eq!(client.get("/health").await.status_code(), 200);
}
