#![allow(clippy::unwrap_used)]
// Integration tests for `TicketService` token handling and error
// classification, against a wiremock ticket API.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketdesk_api::TicketClient;
use ticketdesk_core::{
    AuthFailure, CoreError, MemoryTokenStore, Severity, TicketQuery, TicketService, TicketStatus,
    TokenStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "exp": exp, "username": "jdoe", "name": "Jane Doe", "role": "operator" })
            .to_string(),
    );
    format!("{header}.{payload}.signature")
}

fn fresh_token() -> String {
    jwt((Utc::now() + Duration::hours(1)).timestamp())
}

async fn setup(token: Option<String>) -> (MockServer, TicketService, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let client =
        TicketClient::from_reqwest(&format!("{}/api", server.uri()), reqwest::Client::new())
            .unwrap();
    let store = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
    let service = TicketService::with_client(client, store.clone());
    (server, service, store)
}

fn ticket_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "alarmId": "alarm-1",
        "siteId": "site-1",
        "siteName": "Harbor Substation",
        "severity": "critical",
        "alarmType": "power_failure",
        "description": "Mains power lost",
        "recipients": ["ops@example.com"],
        "emailSentAt": "2024-01-15T08:30:00Z",
        "emailSubject": "Power failure",
        "status": "pending",
        "createdBy": { "username": "system" }
    })
}

fn assert_auth(result: Result<impl std::fmt::Debug, CoreError>, expected: AuthFailure) {
    match result {
        Err(CoreError::Auth { kind }) => assert_eq!(kind, expected),
        other => panic!("expected Auth({expected:?}), got: {other:?}"),
    }
}

// ── Token validation ────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_auth_error_without_request() {
    let (server, service, _) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert_auth(
        service.get_all_tickets(&TicketQuery::default()).await,
        AuthFailure::Missing,
    );
}

#[tokio::test]
async fn test_malformed_token_is_cleared() {
    let (server, service, store) = setup(Some("only.two".into())).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert_auth(
        service.get_all_tickets(&TicketQuery::default()).await,
        AuthFailure::Malformed,
    );
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_expired_token_is_cleared() {
    let expired = jwt((Utc::now() - Duration::minutes(5)).timestamp());
    let (_server, service, store) = setup(Some(expired)).await;

    assert_auth(
        service.get_all_tickets(&TicketQuery::default()).await,
        AuthFailure::Expired,
    );
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_server_401_is_fetch_error_and_keeps_token() {
    let (server, service, store) = setup(Some(fresh_token())).await;

    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = service.get_all_tickets(&TicketQuery::default()).await;
    assert!(matches!(result, Err(CoreError::Fetch { .. })), "got: {result:?}");
    assert!(store.get().unwrap().is_some(), "401 keeps the token");
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_tickets_converts_domain_types() {
    let token = fresh_token();
    let (server, service, store) = setup(Some(token.clone())).await;

    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .and(query_param("status", "pending"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "tickets": [ticket_json("t-1")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = TicketQuery {
        status: Some("pending".into()),
        severity: Some("all".into()),
        ..TicketQuery::default()
    };
    let tickets = service.get_all_tickets(&query).await.unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].severity, Severity::Critical);
    assert_eq!(tickets[0].status, TicketStatus::Pending);
    assert_eq!(store.get().unwrap().unwrap().expose_secret(), token);
}

#[tokio::test]
async fn test_forbidden_carries_server_detail() {
    let (server, service, store) = setup(Some(fresh_token())).await;

    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "detail": "Operators only" })),
        )
        .mount(&server)
        .await;

    match service.get_all_tickets(&TicketQuery::default()).await {
        Err(CoreError::Forbidden { detail }) => assert_eq!(detail, "Operators only"),
        other => panic!("expected Forbidden, got: {other:?}"),
    }
    assert!(store.get().unwrap().is_some(), "403 keeps the token");
}

#[tokio::test]
async fn test_other_failures_are_fetch_errors() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = service.get_all_tickets(&TicketQuery::default()).await;
    assert!(matches!(result, Err(CoreError::Fetch { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_unknown_severity_is_fetch_error() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    let mut bad = ticket_json("t-1");
    bad["severity"] = json!("apocalyptic");
    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([bad])))
        .mount(&server)
        .await;

    let result = service.get_all_tickets(&TicketQuery::default()).await;
    assert!(matches!(result, Err(CoreError::Fetch { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_get_ticket_not_found() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/t-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = service.get_ticket("t-404").await;
    assert!(
        matches!(&result, Err(CoreError::NotFound { id }) if id == "t-404"),
        "got: {result:?}"
    );
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_failure_is_delete_error() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    Mock::given(method("DELETE"))
        .and(path("/api/tickets/t-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("locked"))
        .mount(&server)
        .await;

    let result = service.delete_ticket("t-1").await;
    assert!(
        matches!(&result, Err(CoreError::Delete { id, .. }) if id == "t-1"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_401_is_delete_error_and_keeps_token() {
    let (server, service, store) = setup(Some(fresh_token())).await;

    Mock::given(method("DELETE"))
        .and(path("/api/tickets/t-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = service.delete_ticket("t-1").await;
    assert!(
        matches!(&result, Err(CoreError::Delete { id, .. }) if id == "t-1"),
        "got: {result:?}"
    );
    assert!(store.get().unwrap().is_some());
}

#[tokio::test]
async fn test_delete_without_token_is_auth_error() {
    let (_server, service, _) = setup(None).await;
    assert_auth(service.delete_ticket("t-1").await, AuthFailure::Missing);
}

#[tokio::test]
async fn test_resolve_returns_updated_ticket() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    let mut resolved = ticket_json("t-1");
    resolved["status"] = json!("resolved");
    resolved["resolvedAt"] = json!("2024-01-15T10:00:00Z");
    resolved["notes"] = json!("generator started");

    Mock::given(method("PATCH"))
        .and(path("/api/tickets/t-1/resolve"))
        .and(body_json(json!({ "notes": "generator started" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ticket": resolved })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = service
        .resolve_ticket("t-1", Some("generator started"))
        .await
        .unwrap();
    assert!(ticket.is_resolved());
    assert!(ticket.resolved_at.is_some());
}

#[tokio::test]
async fn test_resolve_failure_is_resolve_error() {
    let (server, service, _) = setup(Some(fresh_token())).await;

    Mock::given(method("PATCH"))
        .and(path("/api/tickets/t-1/resolve"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = service.resolve_ticket("t-1", None).await;
    assert!(matches!(result, Err(CoreError::Resolve { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_resolve_401_is_resolve_error_and_keeps_token() {
    let (server, service, store) = setup(Some(fresh_token())).await;

    Mock::given(method("PATCH"))
        .and(path("/api/tickets/t-1/resolve"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = service.resolve_ticket("t-1", Some("done")).await;
    assert!(
        matches!(&result, Err(CoreError::Resolve { id, .. }) if id == "t-1"),
        "got: {result:?}"
    );
    assert!(store.get().unwrap().is_some());
}

#[tokio::test]
async fn test_token_user_reads_claims() {
    let (_server, service, _) = setup(Some(fresh_token())).await;
    let user = service.token_user().unwrap();
    assert_eq!(user.username, "jdoe");
    assert!(user.role.can_manage_tickets());
}
