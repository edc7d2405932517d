//! Integration tests for the library's `tracing` output.
//!
//! Each test installs a thread-local subscriber that writes into a buffer, so
//! the request-log and change-warning lines can be inspected.

use std::io::Write;
use std::sync::{Arc, Mutex};

use asana_api::{
    ApiToken, Authentication, BaseUrl, Client, ClientConfig, ClientConfigBuilder, IoOptions,
};
use serde_json::json;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}

fn config_for(server: &MockServer) -> ClientConfigBuilder {
    ClientConfig::builder()
        .authentication(Authentication::api_token(ApiToken::new("my-token").unwrap()))
        .base_url(BaseUrl::new(server.uri()).unwrap())
}

async fn mount_change(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Asana-Change",
                    "name=new_flag;info=https://asana.com/flag;affected=true",
                )
                .set_body_json(json!({"data": {}})),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Debug mode
// ============================================================================

#[tokio::test]
async fn test_debug_mode_logs_method_url_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"gid": "1"}})))
        .expect(1)
        .mount(&server)
        .await;
    let (captured, _guard) = capture();

    let client = Client::new(&config_for(&server).debug_mode(true).build().unwrap());
    client
        .post("/tasks", json!({"name": "X"}), &IoOptions::new())
        .await
        .unwrap();

    let logs = captured.contents();
    let expected = format!("POST {}/tasks ({{\"data\":{{\"name\":\"X\"}}}})", server.uri());
    assert!(logs.contains(&expected), "missing request line in:\n{logs}");
}

#[tokio::test]
async fn test_requests_are_not_logged_without_debug_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;
    let (captured, _guard) = capture();

    let client = Client::new(&config_for(&server).build().unwrap());
    client.get("/users/me", &[], &IoOptions::new()).await.unwrap();

    assert!(!captured.contents().contains("GET "));
}

// ============================================================================
// Change warnings
// ============================================================================

#[tokio::test]
async fn test_affected_change_is_warned_about() {
    let server = MockServer::start().await;
    mount_change(&server).await;
    let (captured, _guard) = capture();

    let client = Client::new(&config_for(&server).build().unwrap());
    client.get("/users/me", &[], &IoOptions::new()).await.unwrap();

    let logs = captured.contents();
    assert!(logs.contains("WARN"), "no warning in:\n{logs}");
    assert!(logs.contains("\"new_flag\" deprecation"));
    assert!(logs.contains("https://asana.com/flag"));
}

#[tokio::test]
async fn test_acknowledged_change_is_not_warned_about() {
    let server = MockServer::start().await;
    mount_change(&server).await;
    let (captured, _guard) = capture();

    let client = Client::new(&config_for(&server).build().unwrap());
    client
        .get(
            "/users/me",
            &[],
            &IoOptions::new().header("Asana-Disable", "new_flag"),
        )
        .await
        .unwrap();

    assert!(!captured.contents().contains("new_flag"));
}

#[tokio::test]
async fn test_change_warnings_can_be_disabled() {
    let server = MockServer::start().await;
    mount_change(&server).await;
    let (captured, _guard) = capture();

    let client = Client::new(
        &config_for(&server)
            .log_asana_change_warnings(false)
            .build()
            .unwrap(),
    );
    client.get("/users/me", &[], &IoOptions::new()).await.unwrap();

    assert!(!captured.contents().contains("new_flag"));
}
