//! Outgoing headers, login and typed resource calls against mock services.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use campus_application::ports::SessionStore;
use campus_application::{ApiError, InMemorySessionStore, Service};
use campus_domain::{AuthError, Credentials, Session, SessionContext};
use campus_infrastructure::{CampusClient, ClientConfig};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// {"sub":"u-7","realm_access":{"roles":["ADMIN"]}}
const JWT: &str = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ1LTciLCJyZWFsbV9hY2Nlc3MiOnsicm9sZXMiOlsiQURNSU4iXX19.sig";

fn valid_session() -> Session {
    let mut session = Session::new();
    session.set_tokens("T1", "R1", chrono::Utc::now().timestamp_millis() + 600_000);
    session.set_context(&SessionContext {
        user_id: Some("u-1".to_string()),
        roles: Some(vec!["ADMIN".to_string(), "DIRECTOR".to_string()]),
        institution_id: Some("inst-1".to_string()),
    });
    session
}

fn client(server: &MockServer, session: Session) -> (CampusClient, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::with_session(session));
    let config = ClientConfig::local(&server.uri()).unwrap();
    let client = CampusClient::with_store(&config, store.clone()).unwrap();
    (client, store)
}

fn header<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn scoped_call_sends_bearer_and_context_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server, valid_session());
    let _: Vec<Value> = client.users().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    assert_eq!(header(request, "authorization"), Some("Bearer T1"));
    assert_eq!(header(request, "content-type"), Some("application/json"));
    assert_eq!(header(request, "accept"), Some("application/json"));
    assert_eq!(header(request, "x-user-id"), Some("u-1"));
    assert_eq!(header(request, "x-user-roles"), Some("ADMIN,DIRECTOR"));
    assert_eq!(header(request, "x-institution-id"), Some("inst-1"));
}

#[tokio::test]
async fn call_without_token_omits_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reset/request"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server, Session::new());
    let result: Value = client
        .password_reset()
        .post_action("request", &json!({"email": "ana@school.test"}))
        .await
        .unwrap();

    assert_eq!(result, Value::Null);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(header(&requests[0], "authorization"), None);
    assert_eq!(header(&requests[0], "x-institution-id"), None);
}

#[tokio::test]
async fn scoped_call_without_institution_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new();
    session.set_tokens("T1", "R1", chrono::Utc::now().timestamp_millis() + 600_000);
    let (client, _) = client(&server, session);

    let error = client.enrollments().list::<Value>().await.unwrap_err();
    assert!(matches!(error, ApiError::Validation(_)));
}

#[tokio::test]
async fn typed_create_round_trips_through_service() {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NewEnrollment<'a> {
        student_id: &'a str,
        grade: &'a str,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Enrollment {
        id: String,
        student_id: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/enrollments"))
        .and(body_json(json!({"studentId": "s-1", "grade": "5A"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "e-1", "studentId": "s-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server, valid_session());
    let created: Enrollment = client
        .resource(Service::Enrollments)
        .create(&NewEnrollment {
            student_id: "s-1",
            grade: "5A",
        })
        .await
        .unwrap();

    assert_eq!(
        created,
        Enrollment {
            id: "e-1".to_string(),
            student_id: "s-1".to_string(),
        }
    );
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/user-institution/a-9"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "assignment in use"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server, valid_session());
    let error = client.user_institution().delete("a-9").await.unwrap_err();

    assert!(matches!(
        error,
        ApiError::Http { status: 409, ref message } if message == "assignment in use"
    ));
}

#[tokio::test]
async fn login_stores_tokens_and_claims() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": JWT,
            "refresh_token": "R1",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client(&server, Session::new());
    client
        .auth()
        .login(&Credentials::new("admin", "secret"))
        .await
        .unwrap();

    let session = store.read();
    assert_eq!(session.access_token.as_deref(), Some(JWT));
    assert_eq!(session.refresh_token.as_deref(), Some("R1"));
    assert_eq!(session.user_id.as_deref(), Some("u-7"));
    assert_eq!(session.roles, Some(vec!["ADMIN".to_string()]));
    assert!(client.auth().is_token_valid());
}

#[tokio::test]
async fn login_rejection_carries_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error_description": "Invalid user credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client(&server, Session::new());
    let error = client
        .auth()
        .login(&Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Auth(AuthError::Rejected { ref description })
            if description == "Invalid user credentials"
    ));
    assert!(store.read().is_empty());
}
