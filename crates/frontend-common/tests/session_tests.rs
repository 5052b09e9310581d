//! Session lifecycle against a mock API server

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use waypoint_frontend_common::{
    AppContext, MemoryStorage, Navigation, NotificationKind, RouteGuard, RuntimeConfig, Session,
    SessionStatus, TokenStorage,
};
use waypoint_http::{ClientError, User};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "a@b.com",
        "name": null,
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn expected_user() -> User {
    User {
        id: 1,
        email: "a@b.com".to_string(),
        name: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

fn context(server: &MockServer, storage: &MemoryStorage) -> AppContext {
    let config = RuntimeConfig {
        api_base: server.uri(),
        ..RuntimeConfig::default()
    };
    AppContext::new(config, Arc::new(storage.clone())).unwrap()
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": token })))
        .mount(server)
        .await;
}

async fn mount_current_user(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_sets_session_and_persists_token() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);

    let user = ctx.session().login("a@b.com", "pw").await.unwrap();
    assert_eq!(user, expected_user());

    assert_eq!(
        ctx.session().session(),
        Session {
            user: Some(expected_user()),
            token: Some("T".to_string()),
            is_authenticated: true,
        }
    );
    assert_eq!(storage.get_item("auth_token").as_deref(), Some("T"));
    assert_eq!(ctx.session().status(), SessionStatus::Authenticated);

    let notification = ctx.app().notification();
    assert!(notification.show);
    assert_eq!(notification.kind, NotificationKind::Success);
    assert!(!ctx.app().is_loading());
}

#[tokio::test]
async fn test_login_then_logout_clears_everything() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);

    ctx.session().login("a@b.com", "pw").await.unwrap();
    ctx.session().logout();

    assert_eq!(ctx.session().session(), Session::default());
    assert_eq!(storage.get_item("auth_token"), None);
    assert_eq!(ctx.session().status(), SessionStatus::Unauthenticated);

    let notification = ctx.app().notification();
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(notification.message, "Logged out");
}

#[tokio::test]
async fn test_initialize_without_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(0)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);
    ctx.start().await;

    assert_eq!(ctx.session().session(), Session::default());
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!ctx.app().notification().show);
}

#[tokio::test]
async fn test_initialize_restores_persisted_session() {
    let server = MockServer::start().await;
    mount_current_user(&server, "persisted").await;

    let storage = MemoryStorage::new();
    storage.set_item("auth_token", "persisted");
    let ctx = context(&server, &storage);
    ctx.start().await;

    let session = ctx.session().session();
    assert!(session.is_authenticated);
    assert_eq!(session.token.as_deref(), Some("persisted"));
    assert_eq!(session.user, Some(expected_user()));
}

#[tokio::test]
async fn test_initialize_with_rejected_token_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    storage.set_item("auth_token", "stale");
    let ctx = context(&server, &storage);
    ctx.start().await;

    assert_eq!(ctx.session().session(), Session::default());
    assert_eq!(storage.get_item("auth_token"), None);
    assert_eq!(ctx.app().notification().message, "Logged out");
}

#[tokio::test]
async fn test_login_failure_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);

    let result = ctx.session().login("a@b.com", "pw").await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));

    let notification = ctx.app().notification();
    assert!(notification.show);
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Invalid credentials");

    assert!(!ctx.app().is_loading());
    assert_eq!(ctx.session().session(), Session::default());
    assert_eq!(storage.get_item("auth_token"), None);
}

#[tokio::test]
async fn test_login_failure_without_payload_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let ctx = context(&server, &MemoryStorage::new());

    let result = ctx.session().login("a@b.com", "pw").await;
    assert!(matches!(result, Err(ClientError::ServerError { status: 500, .. })));
    assert_eq!(ctx.app().notification().message, "Login failed");
    assert!(!ctx.app().is_loading());
}

#[tokio::test]
async fn test_login_rolls_back_token_when_user_lookup_fails() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);

    assert!(ctx.session().login("a@b.com", "pw").await.is_err());
    assert_eq!(ctx.session().session(), Session::default());
    assert_eq!(storage.get_item("auth_token"), None);
    assert_eq!(ctx.app().notification().kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_fetch_current_user_failure_keeps_session() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);
    ctx.session().login("a@b.com", "pw").await.unwrap();
    let before = ctx.session().session();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = ctx.session().fetch_current_user().await;
    assert!(matches!(result, Err(ClientError::ServerError { status: 503, .. })));
    assert_eq!(ctx.session().session(), before);
    assert_eq!(storage.get_item("auth_token").as_deref(), Some("T"));
}

#[tokio::test]
async fn test_fetch_current_user_refreshes_user() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let ctx = context(&server, &MemoryStorage::new());
    ctx.session().login("a@b.com", "pw").await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "a@b.com",
            "name": "Ada",
            "createdAt": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let user = ctx.session().fetch_current_user().await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(ctx.session().user().and_then(|u| u.name), Some("Ada".to_string()));
    assert!(ctx.session().is_authenticated());
}

#[tokio::test]
async fn test_status_is_authenticating_while_login_runs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "T" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_current_user(&server, "T").await;

    let ctx = context(&server, &MemoryStorage::new());
    let session = ctx.session().clone();
    let login = tokio::spawn(async move { session.login("a@b.com", "pw").await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(ctx.session().status(), SessionStatus::Authenticating);
    assert!(ctx.app().is_loading());

    login.await.unwrap().unwrap();
    assert_eq!(ctx.session().status(), SessionStatus::Authenticated);
    assert!(!ctx.app().is_loading());
}

#[tokio::test]
async fn test_cancelled_login_releases_loading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "T" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let ctx = context(&server, &storage);
    let session = ctx.session().clone();
    let login = tokio::spawn(async move { session.login("a@b.com", "pw").await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(ctx.app().is_loading());
    assert_eq!(ctx.session().status(), SessionStatus::Authenticating);

    login.abort();
    assert!(login.await.unwrap_err().is_cancelled());

    assert!(!ctx.app().is_loading());
    assert_eq!(ctx.session().status(), SessionStatus::Unauthenticated);
    assert_eq!(ctx.session().session(), Session::default());
    assert_eq!(storage.get_item("auth_token"), None);
}

#[tokio::test]
async fn test_navigation_follows_session() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let ctx = context(&server, &MemoryStorage::new());

    assert_eq!(ctx.navigate("/login"), Navigation::Allow);
    assert_eq!(
        ctx.navigate("/dashboard"),
        Navigation::Redirect("/login?redirect=/dashboard".to_string())
    );

    ctx.session().login("a@b.com", "pw").await.unwrap();

    assert_eq!(ctx.navigate("/login"), Navigation::Redirect("/".to_string()));
    assert_eq!(ctx.navigate("/dashboard"), Navigation::Allow);
}

#[tokio::test]
async fn test_custom_guard_policy() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let ctx = context(&server, &MemoryStorage::new()).with_guard(
        RouteGuard::new()
            .with_home_path("/dashboard")
            .with_public_route("/about"),
    );
    assert_eq!(ctx.config().api_base, server.uri());

    assert_eq!(ctx.navigate("/about"), Navigation::Allow);
    ctx.session().login("a@b.com", "pw").await.unwrap();
    assert_eq!(
        ctx.navigate("/login"),
        Navigation::Redirect("/dashboard".to_string())
    );
}

#[tokio::test]
async fn test_subscribers_see_login() {
    let server = MockServer::start().await;
    mount_login(&server, "T").await;
    mount_current_user(&server, "T").await;

    let ctx = context(&server, &MemoryStorage::new());
    let mut sessions = ctx.session().subscribe();

    ctx.session().login("a@b.com", "pw").await.unwrap();

    assert!(sessions.has_changed().unwrap());
    assert!(sessions.borrow_and_update().is_authenticated);
}
