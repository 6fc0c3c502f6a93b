use serde_json::json;
use std::sync::Arc;
use venta_client::{ApiError, FileStorage, SessionStore, Settings, VentaClient};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VentaClient {
    let mut settings = Settings::new_for_test().unwrap();
    settings.api.base_url = server.uri();
    VentaClient::new(settings).unwrap()
}

fn ana_credentials() -> serde_json::Value {
    json!({
        "id": 42,
        "nombre": "Ana",
        "apellido": "Lopez",
        "nombre_completo": "Ana Lopez",
        "correo": "ana@x.com",
        "access": "tok-abc"
    })
}

#[tokio::test]
async fn test_login_stores_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_json(json!({"correo": "ana@x.com", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_credentials()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client.auth().login("ana@x.com", "secret123").await.unwrap();

    assert_eq!(user.id, 42);
    assert_eq!(client.session().token(), Some("tok-abc".to_string()));
    assert_eq!(client.session().current_user().unwrap().id, 42);
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_failure_propagates_and_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.auth().login("ana@x.com", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(client.session().token(), None);
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn test_register_succeeds_even_when_profile_creation_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registro/"))
        .and(body_partial_json(json!({
            "nombre": "Ana",
            "apellido": "Lopez",
            "correo": "ana@x.com",
            "rol": "cliente"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ana_credentials()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/perfiles/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .auth()
        .register("Ana", "Lopez", "Ana Lopez", "ana@x.com", "secret123")
        .await
        .unwrap();

    assert_eq!(user.id, 42);
    assert_eq!(client.session().token(), Some("tok-abc".to_string()));
    assert_eq!(client.session().current_user().unwrap().id, 42);

    // the dependent profile call was attempted exactly once
    let profile_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/perfiles/")
        .count();
    assert_eq!(profile_calls, 1);
}

#[tokio::test]
async fn test_logout_clears_everything_without_server_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_credentials()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.auth().login("ana@x.com", "secret123").await.unwrap();
    let before_logout = server.received_requests().await.unwrap().len();

    client.auth().logout();

    assert_eq!(client.session().token(), None);
    assert!(client.session().current_user().is_none());
    // logout is purely local teardown
    assert_eq!(server.received_requests().await.unwrap().len(), before_logout);
}

#[tokio::test]
async fn test_verify_token_is_a_local_presence_check() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client.auth().verify_token().unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_credentials()))
        .mount(&server)
        .await;
    client.auth().login("ana@x.com", "secret123").await.unwrap();
    let calls_after_login = server.received_requests().await.unwrap().len();

    let user = client.auth().verify_token().unwrap();
    assert_eq!(user.id, 42);
    // no liveness round trip happened
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        calls_after_login
    );
}

#[tokio::test]
async fn test_handle_unauthorized_tears_the_session_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_credentials()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.auth().login("ana@x.com", "secret123").await.unwrap();

    let not_auth = ApiError::RequestFailed {
        status: 401,
        message: "token expired".to_string(),
        body: json!({}),
    };
    assert!(client.auth().handle_unauthorized(&not_auth));
    assert_eq!(client.session().token(), None);

    // other statuses leave the session alone
    client.auth().login("ana@x.com", "secret123").await.unwrap();
    let server_down = ApiError::RequestFailed {
        status: 500,
        message: "down".to_string(),
        body: json!({}),
    };
    assert!(!client.auth().handle_unauthorized(&server_down));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_session_rehydrates_from_file_storage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana_credentials()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage_path = dir.path().join("session.json");

    let mut settings = Settings::new_for_test().unwrap();
    settings.api.base_url = server.uri();
    settings.storage.path = storage_path.to_string_lossy().into_owned();

    let client = VentaClient::new(settings.clone()).unwrap();
    client.auth().login("ana@x.com", "secret123").await.unwrap();
    drop(client);

    // a fresh process over the same file picks the session back up
    let session = SessionStore::new(Arc::new(FileStorage::new(&storage_path)));
    assert_eq!(session.token(), Some("tok-abc".to_string()));
    assert_eq!(session.current_user().unwrap().email, "ana@x.com");

    let reopened = VentaClient::new(settings).unwrap();
    assert!(reopened.session().is_authenticated());
}
