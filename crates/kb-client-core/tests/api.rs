//! Runs the client against a mock server

use kb_client_core::{
    notify::{NOTIFY_NO_PERMISSION, NOTIFY_REQUEST_FAILED, NOTIFY_SESSION_EXPIRED},
    storage::{DurableStorage as _, MemoryStorage},
    CallError, Client, ClientSettings, IdentityStore, Notification, NotificationLog, Router,
};
use kb_shared::{
    const_config::{
        route::{ROUTE_CHAT, ROUTE_LOGIN},
        storage::{STORAGE_KEY_TOKEN, STORAGE_KEY_USER_INFO},
    },
    req_args::{api::chat::SessionReqArgs, LoginReqArgs},
    uac::UserIdentity,
};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

struct TestApp {
    server: MockServer,
    storage: Arc<MemoryStorage>,
    notifications: NotificationLog,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        Self::spawn_with_timeout(Duration::from_secs(5)).await
    }

    async fn spawn_with_timeout(timeout: Duration) -> Self {
        Self::spawn_with(|server| ClientSettings {
            server_address: server.uri(),
            timeout,
            unauthorized_clears_identity: true,
        })
        .await
    }

    async fn spawn_with(settings: impl FnOnce(&MockServer) -> ClientSettings) -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let identity = IdentityStore::load(storage.clone());
        let router = Router::new(identity.clone());
        let notifications = NotificationLog::new();
        let settings = settings(&server);
        let client = Client::new(
            settings,
            identity,
            router,
            Arc::new(notifications.clone()),
        )
        .unwrap();
        Self {
            server,
            storage,
            notifications,
            client,
        }
    }

    /// Puts the client in the state it has after a successful login, on the
    /// chat page
    fn signed_in(self) -> Self {
        self.client
            .identity()
            .set_token(&SecretString::from("abc".to_string()));
        self.client.identity().login(UserIdentity::with_role("user"));
        self.client.router().push(ROUTE_CHAT);
        self
    }

    fn session_args() -> SessionReqArgs {
        SessionReqArgs {
            session_id: "s1".to_string(),
        }
    }
}

fn call_error(err: &anyhow::Error) -> &CallError {
    err.downcast_ref::<CallError>()
        .unwrap_or_else(|| panic!("expected a call error but got: {err:?}"))
}

#[tokio::test]
async fn login_stores_identity_and_token() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .and(body_json(json!({"account": "root", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "account": "root", "role": "admin", "token": "abc", "refresh": "def"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .login(
            LoginReqArgs::new("root", SecretString::from("pw".to_string())),
            || {},
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(actual.account(), Some("root"));
    assert!(app.client.identity().is_admin());
    assert_eq!(
        app.storage.get_item(STORAGE_KEY_TOKEN).unwrap().as_deref(),
        Some("abc")
    );
    assert!(app.notifications.is_empty());
}

#[tokio::test]
async fn token_is_attached_when_present() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("GET"))
        .and(path("/api/chat/get_history/"))
        .and(query_param("session_id", "s1"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "messages": [{"role": "user", "content": "hello", "timestamp": 1718000000.0}]
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .get_history(&TestApp::session_args(), || {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(actual.messages.len(), 1);
    assert_eq!(actual.messages[0].content, "hello");
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge/graph/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": [], "links": []})))
        .mount(&app.server)
        .await;

    app.client.graph(|| {}).await.unwrap().unwrap();

    let requests = app.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_expires_session_and_redirects_to_login() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("POST"))
        .and(path("/api/chat/clear_history/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .clear_history(&TestApp::session_args(), || {})
        .await
        .unwrap();

    let err = actual.unwrap_err();
    assert_eq!(call_error(&err).status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(
        app.notifications.drain(),
        vec![Notification::error(NOTIFY_SESSION_EXPIRED)]
    );
    assert!(!app.storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(!app.storage.contains_key(STORAGE_KEY_USER_INFO));
    assert_eq!(app.client.router().current_path(), ROUTE_LOGIN);
}

#[tokio::test]
async fn forbidden_notifies_without_touching_storage() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&app.server)
        .await;

    let actual = app.client.list_users(|| {}).await.unwrap();

    let err = actual.unwrap_err();
    assert_eq!(call_error(&err).status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(
        app.notifications.drain(),
        vec![Notification::error(NOTIFY_NO_PERMISSION)]
    );
    assert!(app.storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(app.storage.contains_key(STORAGE_KEY_USER_INFO));
    assert_eq!(app.client.router().current_path(), ROUTE_CHAT);
}

#[tokio::test]
async fn other_status_notifies_with_server_message() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("GET"))
        .and(path("/api/chat/get_symptoms/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Session id required"})),
        )
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .get_symptoms(&TestApp::session_args(), || {})
        .await
        .unwrap();

    assert!(actual.is_err());
    assert_eq!(
        app.notifications.drain(),
        vec![Notification::error("Session id required")]
    );
}

#[tokio::test]
async fn other_status_without_message_uses_generic_text() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("POST"))
        .and(path("/api/chat/create_session/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&app.server)
        .await;

    let actual = app.client.create_session(|| {}).await.unwrap();

    assert!(actual.is_err());
    assert_eq!(
        app.notifications.drain(),
        vec![Notification::error(NOTIFY_REQUEST_FAILED)]
    );
}

#[tokio::test]
async fn no_response_is_silent() {
    let app = TestApp::spawn_with_timeout(Duration::from_millis(200))
        .await
        .signed_in();
    Mock::given(method("GET"))
        .and(path("/api/users/verify_token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "valid"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&app.server)
        .await;

    let actual = app.client.verify_token(|| {}).await.unwrap();

    let err = actual.unwrap_err();
    assert!(
        matches!(call_error(&err), CallError::NoResponse(_)),
        "{err:?}"
    );
    assert!(app.notifications.is_empty());
    assert!(app.storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(app.storage.contains_key(STORAGE_KEY_USER_INFO));
    assert_eq!(app.client.router().current_path(), ROUTE_CHAT);
}

#[tokio::test]
async fn unbuildable_request_is_rejected_silently() {
    let app = TestApp::spawn_with(|_| ClientSettings {
        server_address: "http://[::1".to_string(),
        ..Default::default()
    })
    .await
    .signed_in();

    let actual = app.client.verify_token(|| {}).await.unwrap();

    let err = actual.unwrap_err();
    assert!(matches!(call_error(&err), CallError::Build(_)), "{err:?}");
    assert!(app.notifications.is_empty());
    assert!(app.storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(app.storage.contains_key(STORAGE_KEY_USER_INFO));
    assert_eq!(app.client.router().current_path(), ROUTE_CHAT);
    assert!(app.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn logout_clears_session_even_if_server_fails() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("POST"))
        .and(path("/api/users/logout/"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "boom"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let actual = app.client.logout(|| {}).await.unwrap();

    assert!(actual.is_err());
    assert!(!app.client.identity().is_logged_in());
    assert!(!app.storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(!app.storage.contains_key(STORAGE_KEY_USER_INFO));
}

#[tokio::test]
async fn stream_chat_assembles_reply() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("GET"))
        .and(path("/api/chat/stream_chat/"))
        .and(query_param("message", "hello"))
        .and(query_param("session_id", "s1"))
        .and(query_param("token", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("data: H\n\ndata: i\n\ndata:  \n\ndata: \\n\n\ndata: !\n\ndata: [DONE]\n\n"),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .stream_chat("hello".to_string(), "s1".to_string(), || {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(actual, "Hi \n!");
}

#[tokio::test]
async fn stream_chat_error_event_is_an_error() {
    let app = TestApp::spawn().await.signed_in();
    Mock::given(method("GET"))
        .and(path("/api/chat/stream_chat/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("data: Error: Message is required\n\n"),
        )
        .mount(&app.server)
        .await;

    let actual = app
        .client
        .stream_chat(String::new(), "s1".to_string(), || {})
        .await
        .unwrap();

    let err = actual.unwrap_err();
    assert_eq!(
        call_error(&err),
        &CallError::Stream("Message is required".to_string())
    );
    assert!(app.notifications.is_empty());
}

#[tokio::test]
async fn ui_callback_runs_after_completion() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/users/verify_token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "valid"})))
        .mount(&app.server)
        .await;
    let (tx, rx) = futures::channel::oneshot::channel();

    let actual = app
        .client
        .verify_token(move || {
            let _ = tx.send(());
        })
        .await
        .unwrap()
        .unwrap();

    assert!(actual.is_valid());
    rx.await.unwrap();
}
