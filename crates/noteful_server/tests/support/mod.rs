//! Shared integration-test server bootstrap helpers.

#![allow(dead_code)]

use axum_test::TestServer;
use noteful_server::{create_app, AppState, Config, Database};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_body_size: 1024 * 1024,
    }
}

/// Start an in-process server on a fresh database.
///
/// The returned [`Database`] handle shares storage with the server so tests
/// can inspect rows directly. Keep the [`TempDir`] alive for the whole test.
pub fn setup_test_server() -> (TestServer, TempDir, Arc<Database>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("db"));
    let db = Arc::new(Database::new(config.db_path.as_str()).expect("open db"));
    let state = AppState::with_shared_db(config, db.clone());
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, temp_dir, db)
}

/// POST `body` to `path`, assert `201`, and return the created record.
pub async fn create(server: &TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub async fn create_folder(server: &TestServer, name: &str) -> String {
    let folder = create(server, "/api/folders", json!({ "name": name })).await;
    folder["id"].as_str().expect("folder id").to_string()
}

pub async fn create_tag(server: &TestServer, name: &str) -> String {
    let tag = create(server, "/api/tags", json!({ "name": name })).await;
    tag["id"].as_str().expect("tag id").to_string()
}

pub async fn create_note(server: &TestServer, body: Value) -> Value {
    create(server, "/api/notes", body).await
}

/// Assert the `{"status","message"}` error body.
pub fn assert_error(response: &axum_test::TestResponse, status: u16, message: &str) {
    assert_eq!(response.status_code().as_u16(), status);
    let body: Value = response.json();
    assert_eq!(body, json!({ "status": status, "message": message }));
}
