//! Test helpers: build the real router over a temporary upload directory.
//!
//! Run from workspace root: `cargo test -p dropgo-api`.

pub mod fixtures;

use axum_test::TestServer;
use dropgo_api::setup::routes;
use dropgo_api::state::AppState;
use dropgo_core::{Config, ServerConfig};
use dropgo_storage::{LocalUploadStore, UploadStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server and the upload directory it serves.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Setup test app with an empty upload directory.
pub async fn setup_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");

    let config = Config(ServerConfig {
        upload_dir: dir.path().to_path_buf(),
        transfer_chunk_size: 4,
        ..ServerConfig::default()
    });

    let store: Arc<dyn UploadStore> = Arc::new(
        LocalUploadStore::new(dir.path())
            .await
            .expect("Failed to create upload store"),
    );

    let state = Arc::new(AppState::new(&config, store));
    let router = routes::setup_routes(&config, state)
        .await
        .expect("Failed to build router");

    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, dir }
}
