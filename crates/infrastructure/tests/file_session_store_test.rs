//! File-backed session persistence.

#![allow(clippy::unwrap_used)]

use campus_application::ports::{SessionStore, SessionStoreError};
use campus_domain::SessionContext;
use campus_infrastructure::{CampusClient, ClientConfig, FileSessionStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn tokens_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("session.json");

    let store = FileSessionStore::open(&file).unwrap();
    assert!(store.read().is_empty());
    store.write_tokens("A", "R", 42).unwrap();
    store
        .write_context(&SessionContext {
            user_id: Some("u-1".to_string()),
            roles: Some(vec!["TEACHER".to_string()]),
            institution_id: None,
        })
        .unwrap();

    let reopened = FileSessionStore::open(&file).unwrap();
    let session = reopened.read();
    assert_eq!(session.access_token.as_deref(), Some("A"));
    assert_eq!(session.refresh_token.as_deref(), Some("R"));
    assert_eq!(session.expires_at_millis, Some(42));
    assert_eq!(session.user_id.as_deref(), Some("u-1"));
    assert_eq!(session.institution_id, None);
}

#[test]
fn file_uses_persistence_keys() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let store = FileSessionStore::open(&file).unwrap();
    store.write_tokens("A", "R", 42).unwrap();

    let raw: Value = serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
    assert_eq!(
        raw,
        json!({"access_token": "A", "refresh_token": "R", "token_expires": 42})
    );
}

#[test]
fn clear_removes_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let store = FileSessionStore::open(&file).unwrap();
    store.write_tokens("A", "R", 42).unwrap();
    store.clear().unwrap();
    store.clear().unwrap();

    assert!(!file.exists());
    assert!(store.read().is_empty());
}

#[test]
fn malformed_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, "{not json").unwrap();

    let error = FileSessionStore::open(&file).unwrap_err();
    assert!(matches!(error, SessionStoreError::Serialization(_)));
}

#[tokio::test]
async fn refreshed_tokens_are_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let seeded = FileSessionStore::open(&file).unwrap();
    seeded
        .write_tokens("T1", "R1", chrono::Utc::now().timestamp_millis() - 1000)
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user-admin"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T2",
            "refresh_token": "R2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user-admin"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::local(&server.uri())
        .unwrap()
        .with_session_file(&file);
    let client = CampusClient::new(&config).unwrap();
    let users: Vec<Value> = client.user_admin().list().await.unwrap();
    assert!(users.is_empty());

    let on_disk = FileSessionStore::open(&file).unwrap().read();
    assert_eq!(on_disk.access_token.as_deref(), Some("T2"));
    assert_eq!(on_disk.refresh_token.as_deref(), Some("R2"));
}
