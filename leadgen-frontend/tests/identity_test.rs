mod common;

use common::{identity_settings, REDIRECT_TO, TEST_EMAIL, TEST_PASSWORD};
use leadgen_frontend::services::{AuthError, IdentityProvider, SignUpOutcome, SupabaseAuth};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "user": {"id": "user-1", "email": TEST_EMAIL}
    })
}

fn provider(server: &MockServer) -> SupabaseAuth {
    SupabaseAuth::new(reqwest::Client::new(), identity_settings(&server.uri()))
}

async fn mount_password_grant(server: &MockServer, access_token: &str, refresh_token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "test-anon-key"))
        .and(body_json(json!({"email": TEST_EMAIL, "password": TEST_PASSWORD})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_body(access_token, refresh_token)),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn sign_in_caches_the_provider_session() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "access-1", "refresh-1").await;
    let auth = provider(&server);

    assert!(auth.get_session().await.is_none());

    auth.sign_in_with_password(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("sign in succeeds");

    let session = auth.get_session().await.expect("session cached");
    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.user_email(), Some(TEST_EMAIL));
}

#[tokio::test]
async fn sign_in_failure_surfaces_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let error = provider(&server)
        .sign_in_with_password(TEST_EMAIL, "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::Provider { status: 400, .. }));
    assert_eq!(error.to_string(), "Invalid login credentials");
}

#[tokio::test]
async fn error_without_message_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let error = provider(&server)
        .sign_in_with_password(TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Request failed with status 503");
}

#[tokio::test]
async fn refresh_without_session_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = provider(&server).refresh_session().await.unwrap_err();

    assert!(matches!(error, AuthError::MissingSession));
}

#[tokio::test]
async fn refresh_rotates_the_cached_session() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("access-2", "refresh-2")))
        .expect(1)
        .mount(&server)
        .await;

    let auth = provider(&server);
    auth.sign_in_with_password(TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();

    let refreshed = auth.refresh_session().await.expect("refresh succeeds");
    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(auth.get_session().await.unwrap().access_token, "access-2");
}

#[tokio::test]
async fn sign_up_pending_confirmation_leaves_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(query_param("redirect_to", REDIRECT_TO))
        .and(body_json(json!({"email": "new@acme.example", "password": TEST_PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-2",
            "email": "new@acme.example",
            "confirmation_sent_at": "2026-10-18T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = provider(&server);
    let outcome = auth
        .sign_up("new@acme.example", TEST_PASSWORD, REDIRECT_TO)
        .await
        .unwrap();

    assert_eq!(outcome, SignUpOutcome::ConfirmationPending);
    assert!(auth.get_session().await.is_none());
}

#[tokio::test]
async fn sign_up_with_tokens_starts_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("access-9", "refresh-9")))
        .mount(&server)
        .await;

    let auth = provider(&server);
    let outcome = auth
        .sign_up("new@acme.example", TEST_PASSWORD, REDIRECT_TO)
        .await
        .unwrap();

    assert_eq!(outcome, SignUpOutcome::SessionCreated);
    assert_eq!(auth.get_session().await.unwrap().access_token, "access-9");
}

#[tokio::test]
async fn sign_out_drops_local_session_even_when_provider_fails() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"msg": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = provider(&server);
    auth.sign_in_with_password(TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();

    let error = auth.sign_out().await.unwrap_err();

    assert_eq!(error.to_string(), "boom");
    assert!(auth.get_session().await.is_none());
}
