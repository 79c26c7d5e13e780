//! Integration tests for console-client
//!
//! These tests spin up an in-process console backend and use the client to
//! interact with it over real HTTP.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use console_client::testing::{RecordingNavigator, TestServer};
use console_client::{
    ConsoleClient, ConsoleClientError, Contact, DomainListQuery, DomainListResult, EppPassword,
    Registrar, SecuritySettings, UserData, WhoisRegistrarFields,
};

// =============================================================================
// Mock Console Backend
// =============================================================================

const REGISTRAR_ID: &str = "TheRegistrar";

/// Mock backend state shared across handlers
#[derive(Clone, Default)]
struct MockConsole {
    contacts: Arc<Mutex<Vec<Contact>>>,
    security: Arc<Mutex<SecuritySettings>>,
    domain_queries: Arc<Mutex<Vec<String>>>,
}

impl MockConsole {
    fn new() -> Self {
        let state = Self::default();
        state.contacts.lock().push(Contact {
            name: Some("Jane Doe".to_string()),
            email_address: Some("jane@theregistrar.example".to_string()),
            registrar_id: Some(REGISTRAR_ID.to_string()),
            types: Some(vec!["ADMIN".to_string(), "TECH".to_string()]),
            ..Default::default()
        });
        *state.security.lock() = SecuritySettings {
            ip_address_allow_list: Some(vec!["192.0.2.0/24".to_string()]),
            client_certificate: Some("-----BEGIN CERTIFICATE-----".to_string()),
            ..Default::default()
        };
        state
    }
}

fn registrar_param(params: &HashMap<String, String>) -> Option<&str> {
    params
        .get("registrarId")
        .map(String::as_str)
        .filter(|id| *id == REGISTRAR_ID)
}

async fn get_userdata() -> Json<UserData> {
    let mut user_roles = BTreeMap::new();
    user_roles.insert(REGISTRAR_ID.to_string(), "PRIMARY_CONTACT".to_string());
    Json(UserData {
        email_address: Some("jane@theregistrar.example".to_string()),
        global_role: Some("NONE".to_string()),
        is_admin: Some(false),
        user_roles: Some(user_roles),
        product_name: Some("Registry".to_string()),
        ..Default::default()
    })
}

async fn get_registrars() -> Json<serde_json::Value> {
    Json(serde_json::json!([
        {
            "registrarId": REGISTRAR_ID,
            "registrarName": "The Registrar",
            "ianaIdentifier": 9999,
            "allowedTlds": ["example"],
            "lastUpdateTime": "2024-05-01T12:00:00.000Z"
        },
        { "registrarId": "NewRegistrar", "registrarName": "New Registrar" }
    ]))
}

async fn post_registrar(Json(registrar): Json<Registrar>) -> Response {
    if registrar.registrar_id.is_none() {
        return (StatusCode::BAD_REQUEST, "Missing registrarId").into_response();
    }
    Json(registrar).into_response()
}

async fn get_contacts(
    State(state): State<MockConsole>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match registrar_param(&params) {
        Some(_) => Json(state.contacts.lock().clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Registrar not found").into_response(),
    }
}

async fn post_contacts(
    State(state): State<MockConsole>,
    Query(params): Query<HashMap<String, String>>,
    Json(contacts): Json<Vec<Contact>>,
) -> Response {
    match registrar_param(&params) {
        Some(_) => {
            *state.contacts.lock() = contacts.clone();
            Json(contacts).into_response()
        }
        None => (StatusCode::FORBIDDEN, "Not allowed to edit contacts").into_response(),
    }
}

async fn get_domains(
    State(state): State<MockConsole>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    state.domain_queries.lock().push(query.unwrap_or_default());
    Json(serde_json::json!({
        "domains": [
            {
                "domainName": "foo.example",
                "creationTime": "2024-01-01T00:00:00.000Z",
                "registrationExpirationTime": "2025-01-01T00:00:00.000Z",
                "statuses": ["INACTIVE"]
            }
        ],
        "checkpointTime": "2024-06-01T00:00:00.000Z",
        "totalResults": 1
    }))
}

async fn get_security(
    State(state): State<MockConsole>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match registrar_param(&params) {
        Some(_) => Json(state.security.lock().clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Registrar not found").into_response(),
    }
}

async fn post_security(
    State(state): State<MockConsole>,
    Query(params): Query<HashMap<String, String>>,
    Json(settings): Json<SecuritySettings>,
) -> Response {
    match registrar_param(&params) {
        Some(_) => {
            *state.security.lock() = settings.clone();
            Json(settings).into_response()
        }
        None => (StatusCode::FORBIDDEN, "Not allowed").into_response(),
    }
}

async fn post_epp_password(Json(update): Json<EppPassword>) -> Response {
    if update.old_password.as_deref() != Some("current-password") {
        return (StatusCode::FORBIDDEN, "Incorrect previous password").into_response();
    }
    if update.new_password != update.new_password_repeat {
        return (StatusCode::BAD_REQUEST, "New passwords do not match").into_response();
    }
    Json(update).into_response()
}

async fn post_whois_fields(Json(fields): Json<WhoisRegistrarFields>) -> Response {
    if fields.registrar_id.as_deref() != Some(REGISTRAR_ID) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "whois update failed").into_response();
    }
    Json(fields).into_response()
}

fn console_router(state: MockConsole) -> Router {
    Router::new()
        .route("/console-api/userdata", get(get_userdata))
        .route("/console-api/registrars", get(get_registrars))
        .route("/console-api/registrar", post(post_registrar))
        .route(
            "/console-api/settings/contacts",
            get(get_contacts).post(post_contacts),
        )
        .route("/console-api/domain-list", get(get_domains))
        .route(
            "/console-api/settings/security",
            get(get_security).post(post_security),
        )
        .route("/console-api/eppPassword", post(post_epp_password))
        .route("/console-api/settings/whois-fields", post(post_whois_fields))
        .with_state(state)
}

/// Backend where every console call is bounced to the legacy console, which
/// then refuses the request.
fn legacy_router() -> Router {
    Router::new()
        .route(
            "/registrar",
            get(|| async { (StatusCode::UNAUTHORIZED, "legacy console login required") }),
        )
        .fallback(|| async { Redirect::to("/registrar") })
}

/// Backend where the legacy console answers the bounced request with a login
/// page instead of JSON
fn legacy_html_router() -> Router {
    Router::new()
        .route(
            "/registrar",
            get(|| async { Html("<html><body>Sign in</body></html>") }),
        )
        .fallback(|| async { Redirect::to("/registrar") })
}

/// Backend that fails every request with the same 500
fn failing_router() -> Router {
    Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "datastore unavailable")
    })
}

// =============================================================================
// Test Helpers
// =============================================================================

async fn create_test_server() -> (TestServer, MockConsole) {
    let state = MockConsole::new();
    let server = TestServer::start(console_router(state.clone()))
        .await
        .expect("Failed to start test server");
    (server, state)
}

/// Client pointed at a port nothing listens on
fn unreachable_client() -> (ConsoleClient, Arc<RecordingNavigator>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let navigator = Arc::new(RecordingNavigator::default());
    let client = ConsoleClient::new(&format!("http://{}", addr))
        .unwrap()
        .with_navigator(navigator.clone());
    (client, navigator)
}

/// Log sink for a thread-local subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output into a buffer until the guard drops
fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

fn assert_server_error(err: &ConsoleClientError, status: u16, body: &str) {
    match err {
        ConsoleClientError::Server {
            status: actual_status,
            body: actual_body,
            ..
        } => {
            assert_eq!(*actual_status, status);
            assert_eq!(actual_body, body);
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

// =============================================================================
// User Data Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_user_data() {
    let (server, _) = create_test_server().await;

    let user = server.client.fetch_user_data().await.unwrap();
    assert_eq!(user.email_address.as_deref(), Some("jane@theregistrar.example"));
    assert_eq!(user.is_admin, Some(false));
    assert_eq!(
        user.user_roles.unwrap().get(REGISTRAR_ID).map(String::as_str),
        Some("PRIMARY_CONTACT")
    );
}

// =============================================================================
// Registrar Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_registrars() {
    let (server, _) = create_test_server().await;

    let registrars = server.client.fetch_registrars().await.unwrap();
    assert_eq!(registrars.len(), 2);
    assert_eq!(registrars[0].registrar_id.as_deref(), Some(REGISTRAR_ID));
    assert_eq!(registrars[0].iana_identifier, Some(serde_json::json!(9999)));
    assert!(registrars[0].extra.contains_key("lastUpdateTime"));
}

#[tokio::test]
async fn test_save_registrar_round_trips_unknown_fields() {
    let (server, _) = create_test_server().await;

    let mut registrar = server.client.fetch_registrars().await.unwrap().remove(0);
    registrar.phone_number = Some("+1.2125550100".to_string());

    let saved = server.client.save_registrar(&registrar).await.unwrap();
    assert_eq!(saved, registrar);
}

#[tokio::test]
async fn test_save_registrar_failure_is_reraised() {
    let (server, _) = create_test_server().await;

    let err = server
        .client
        .save_registrar(&Registrar::default())
        .await
        .unwrap_err();
    assert_server_error(&err, 400, "Missing registrarId");
    assert_eq!(server.navigator.count(), 0);
}

// =============================================================================
// Contact Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_contacts() {
    let (server, _) = create_test_server().await;

    let contacts = server.client.fetch_contacts(REGISTRAR_ID).await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name.as_deref(), Some("Jane Doe"));
}

#[tokio::test]
async fn test_fetch_contacts_unknown_registrar() {
    let (server, _) = create_test_server().await;

    let err = server.client.fetch_contacts("Nobody").await.unwrap_err();
    assert_server_error(&err, 404, "Registrar not found");
    assert_eq!(err.url().unwrap().path(), "/console-api/settings/contacts");
}

#[tokio::test]
async fn test_save_contacts() {
    let (server, state) = create_test_server().await;

    let contacts = vec![Contact {
        name: Some("John Roe".to_string()),
        email_address: Some("john@theregistrar.example".to_string()),
        types: Some(vec!["BILLING".to_string()]),
        visible_in_whois_as_admin: Some(true),
        ..Default::default()
    }];

    let saved = server
        .client
        .save_contacts(REGISTRAR_ID, &contacts)
        .await
        .unwrap();
    assert_eq!(saved, contacts);
    assert_eq!(*state.contacts.lock(), contacts);
}

#[tokio::test]
async fn test_save_contacts_failure_propagates_raw_error() {
    let (server, _) = create_test_server().await;

    let err = server.client.save_contacts("Nobody", &[]).await.unwrap_err();
    assert_server_error(&err, 403, "Not allowed to edit contacts");
}

// =============================================================================
// Domain Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_domains() {
    let (server, state) = create_test_server().await;

    let result: DomainListResult = server
        .client
        .fetch_domains(&DomainListQuery::new(REGISTRAR_ID))
        .await
        .unwrap();
    assert_eq!(result.total_results, Some(1));
    assert_eq!(result.domains[0].domain_name.as_deref(), Some("foo.example"));
    assert_eq!(
        result.checkpoint_time.as_deref(),
        Some("2024-06-01T00:00:00.000Z")
    );
    assert_eq!(
        *state.domain_queries.lock(),
        vec![format!("registrarId={}", REGISTRAR_ID)]
    );
}

#[tokio::test]
async fn test_fetch_domains_sends_parameters_in_order() {
    let (server, state) = create_test_server().await;

    let query = DomainListQuery::new("123")
        .page_number(2)
        .results_per_page(25)
        .search_term("example");
    server.client.fetch_domains(&query).await.unwrap();

    let query = DomainListQuery::new("123")
        .checkpoint_time("2024-06-01T00:00:00.000Z")
        .page_number(1)
        .results_per_page(10)
        .total_results(42)
        .search_term("foo");
    server.client.fetch_domains(&query).await.unwrap();

    assert_eq!(
        *state.domain_queries.lock(),
        vec![
            "registrarId=123&pageNumber=2&resultsPerPage=25&searchTerm=example".to_string(),
            "registrarId=123&checkpointTime=2024-06-01T00:00:00.000Z&pageNumber=1\
             &resultsPerPage=10&totalResults=42&searchTerm=foo"
                .to_string(),
        ]
    );
}

// =============================================================================
// Security Tests
// =============================================================================

#[tokio::test]
async fn test_security_settings_round_trip() {
    let (server, state) = create_test_server().await;

    let mut settings = server
        .client
        .fetch_security_settings(REGISTRAR_ID)
        .await
        .unwrap();
    assert_eq!(
        settings.ip_address_allow_list,
        Some(vec!["192.0.2.0/24".to_string()])
    );

    settings.failover_client_certificate = Some("-----BEGIN CERTIFICATE-----".to_string());
    let saved = server
        .client
        .save_security_settings(REGISTRAR_ID, &settings)
        .await
        .unwrap();
    assert_eq!(saved, settings);
    assert_eq!(*state.security.lock(), settings);
}

#[tokio::test]
async fn test_save_epp_password() {
    let (server, _) = create_test_server().await;

    let update = EppPassword::new(REGISTRAR_ID, "current-password", "new-password-1");
    let saved = server.client.save_epp_password(&update).await.unwrap();
    assert_eq!(saved, update);
}

#[tokio::test]
async fn test_save_epp_password_wrong_old_password() {
    let (server, _) = create_test_server().await;

    let update = EppPassword::new(REGISTRAR_ID, "guess", "new-password-1");
    let err = server.client.save_epp_password(&update).await.unwrap_err();
    assert_server_error(&err, 403, "Incorrect previous password");
}

// =============================================================================
// WHOIS Tests
// =============================================================================

#[tokio::test]
async fn test_save_whois_fields() {
    let (server, _) = create_test_server().await;

    let fields: WhoisRegistrarFields = serde_json::from_value(serde_json::json!({
        "registrarId": REGISTRAR_ID,
        "whoisServer": "whois.theregistrar.example",
        "url": "https://theregistrar.example",
        "localizedAddress": {
            "street": ["123 Example Street"],
            "city": "Springfield",
            "countryCode": "US"
        }
    }))
    .unwrap();

    let saved = server.client.save_whois_fields(&fields).await.unwrap();
    assert_eq!(saved, fields);
}

// =============================================================================
// Shared Failure Handler Tests
// =============================================================================

#[tokio::test]
async fn test_read_without_fallback_reraises_server_error() {
    let server = TestServer::start(failing_router()).await.unwrap();

    let err = server.client.fetch_user_data().await.unwrap_err();
    assert_server_error(&err, 500, "datastore unavailable");
    assert_eq!(err.url().unwrap().path(), "/console-api/userdata");
    assert_eq!(server.navigator.count(), 0);
}

#[tokio::test]
async fn test_read_with_fallback_masks_server_error() {
    let server = TestServer::start(failing_router()).await.unwrap();

    let fallback = vec![Registrar {
        registrar_id: Some("mock".to_string()),
        ..Default::default()
    }];
    let registrars = server
        .client
        .get_json("/registrars", Some(fallback.clone()))
        .await
        .unwrap();
    assert_eq!(registrars, fallback);
    assert_eq!(server.navigator.count(), 0);
}

#[tokio::test]
async fn test_read_redirected_to_legacy_console_navigates_once() {
    let server = TestServer::start(legacy_router()).await.unwrap();

    let err = server.client.fetch_registrars().await.unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");

    let navigated = server.navigator.urls();
    assert_eq!(navigated.len(), 1);
    assert_eq!(navigated[0].path(), "/registrar");
    assert_eq!(Some(&navigated[0]), err.url());
}

#[tokio::test]
async fn test_read_redirected_to_legacy_console_still_uses_fallback() {
    let server = TestServer::start(legacy_router()).await.unwrap();

    let user = server
        .client
        .get_json("/userdata", Some(UserData::default()))
        .await
        .unwrap();
    assert_eq!(user, UserData::default());
    assert_eq!(server.navigator.count(), 1);
}

#[tokio::test]
async fn test_each_read_navigates_on_legacy_path() {
    let server = TestServer::start(legacy_router()).await.unwrap();
    let client = &server.client;

    assert!(client.fetch_contacts(REGISTRAR_ID).await.is_err());
    assert!(client
        .fetch_domains(&DomainListQuery::new(REGISTRAR_ID))
        .await
        .is_err());
    assert!(client.fetch_registrars().await.is_err());
    assert!(client.fetch_security_settings(REGISTRAR_ID).await.is_err());
    assert!(client.fetch_user_data().await.is_err());

    assert_eq!(server.navigator.count(), 5);
}

#[tokio::test]
async fn test_writes_bypass_legacy_navigation() {
    let server = TestServer::start(legacy_router()).await.unwrap();
    let client = &server.client;

    let err = client.save_contacts(REGISTRAR_ID, &[]).await.unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");
    let err = client
        .save_epp_password(&EppPassword::new(REGISTRAR_ID, "a", "b"))
        .await
        .unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");
    let err = client
        .save_whois_fields(&WhoisRegistrarFields::default())
        .await
        .unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");
    let err = client
        .save_security_settings(REGISTRAR_ID, &SecuritySettings::default())
        .await
        .unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");

    assert_eq!(server.navigator.count(), 0);
}

#[tokio::test]
async fn test_save_registrar_shares_read_handler() {
    let server = TestServer::start(legacy_router()).await.unwrap();

    let registrar = Registrar {
        registrar_id: Some(REGISTRAR_ID.to_string()),
        ..Default::default()
    };
    let err = server.client.save_registrar(&registrar).await.unwrap_err();
    assert_server_error(&err, 401, "legacy console login required");
    assert_eq!(server.navigator.count(), 1);
}

#[tokio::test]
async fn test_network_failure_is_client_error() {
    let (client, navigator) = unreachable_client();

    let err = client.fetch_user_data().await.unwrap_err();
    assert!(matches!(err, ConsoleClientError::Client { .. }));
    assert_eq!(err.status(), None);
    assert_eq!(navigator.count(), 0);
}

#[tokio::test]
async fn test_network_failure_with_fallback() {
    let (client, _) = unreachable_client();

    let contacts = client
        .get_json(
            "/settings/contacts?registrarId=TheRegistrar",
            Some(Vec::<Contact>::new()),
        )
        .await
        .unwrap();
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn test_undecodable_body_is_client_error() {
    let router = Router::new().route("/console-api/userdata", get(|| async { "not json" }));
    let server = TestServer::start(router).await.unwrap();

    let err = server.client.fetch_user_data().await.unwrap_err();
    match err {
        ConsoleClientError::Client { url, message } => {
            assert_eq!(url.unwrap().path(), "/console-api/userdata");
            assert!(message.starts_with("Failed to parse response"));
        }
        other => panic!("expected client error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_legacy_console_login_page_navigates_once() {
    let server = TestServer::start(legacy_html_router()).await.unwrap();

    let err = server.client.fetch_user_data().await.unwrap_err();
    match &err {
        ConsoleClientError::Client { url, message } => {
            assert_eq!(url.as_ref().map(|u| u.path()), Some("/registrar"));
            assert!(message.starts_with("Failed to parse response"));
        }
        other => panic!("expected client error, got {:?}", other),
    }

    assert_eq!(server.navigator.count(), 1);
    assert_eq!(server.navigator.urls()[0].path(), "/registrar");
}

#[tokio::test]
async fn test_failed_read_logs_status_and_body() {
    let server = TestServer::start(failing_router()).await.unwrap();
    let (logs, _guard) = capture_logs();

    assert!(server.client.fetch_user_data().await.is_err());

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error logged: {output:?}");
    assert!(output.contains("Backend returned code 500, body was: datastore unavailable"));
}

#[tokio::test]
async fn test_failed_writes_log_nothing() {
    let server = TestServer::start(failing_router()).await.unwrap();
    let client = &server.client;
    let (logs, _guard) = capture_logs();

    assert!(client.save_contacts(REGISTRAR_ID, &[]).await.is_err());
    assert!(client
        .save_epp_password(&EppPassword::new(REGISTRAR_ID, "a", "b"))
        .await
        .is_err());
    assert!(client
        .save_whois_fields(&WhoisRegistrarFields::default())
        .await
        .is_err());
    assert!(client
        .save_security_settings(REGISTRAR_ID, &SecuritySettings::default())
        .await
        .is_err());
    assert_eq!(logs.contents(), "");

    // The registrar save shares the read handler
    let registrar = Registrar::default();
    assert!(client.save_registrar(&registrar).await.is_err());
    assert!(logs.contents().contains("Backend returned code 500"));
}

#[tokio::test]
async fn test_network_failure_logs_message() {
    let (client, _) = unreachable_client();
    let (logs, _guard) = capture_logs();

    let err = client.fetch_user_data().await.unwrap_err();

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error logged: {output:?}");
    assert!(output.contains(&err.to_string()));
    assert!(!output.contains("Backend returned code"));
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let router = Router::new().route(
        "/api/userdata",
        get(|| async { Json(serde_json::json!({ "emailAddress": "admin@registry.example" })) }),
    );
    let server = TestServer::start(router).await.unwrap();
    let client = server.client.clone().with_api_prefix("/api");

    let user = client.fetch_user_data().await.unwrap();
    assert_eq!(user.email_address.as_deref(), Some("admin@registry.example"));
}

#[tokio::test]
async fn test_requests_fail_after_shutdown() {
    let (server, _) = create_test_server().await;
    let client = server.client.clone();

    server.shutdown().await;

    let err = client.fetch_user_data().await.unwrap_err();
    assert!(matches!(err, ConsoleClientError::Client { .. }));
}
