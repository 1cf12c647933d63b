//! Integration tests for Ledgerdesk.
//!
//! Each test builds the full router over a fresh store in a temporary
//! directory and drives it in-process with `tower::ServiceExt::oneshot`.
//! No server or external database is needed:
//!
//! ```bash
//! cargo test -p ledgerdesk-integration-tests
//! ```
//!
//! [`TestApp`] keeps the session cookie between requests the way a browser
//! would, so a test logs in once and the following calls are authenticated.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use ledgerdesk_server::config::ServerConfig;
use ledgerdesk_server::db::{Store, schema};
use ledgerdesk_server::state::AppState;

/// Seeded administrator credentials.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

const MULTIPART_BOUNDARY: &str = "ledgerdesk-test-boundary";

/// Raw response pieces for non-JSON endpoints.
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The application over a throwaway store, plus a one-cookie jar.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Fresh store with the schema in place and the default admin seeded.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = ServerConfig::new(dir.path().join("ledgerdesk.db"));
        config.upload_dir = dir.path().join("uploads");
        config.public_dir = dir.path().join("public");

        let store = Store::open(&config.database_path)
            .await
            .expect("Failed to open store");
        schema::ensure_schema(&store.pool().expect("Store unavailable"))
            .await
            .expect("Failed to initialize schema");

        let state = AppState::new(config, store);
        let router = ledgerdesk_server::app(state.clone());

        Self {
            dir,
            state,
            router,
            cookie: None,
        }
    }

    /// Same as [`TestApp::new`], already logged in as the default admin.
    pub async fn logged_in() -> Self {
        let mut app = Self::new().await;
        let (_, body) = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(body["success"], json!(true), "admin login failed: {body}");
        app
    }

    /// Direct handle on the store for assertions.
    pub fn pool(&self) -> SqlitePool {
        self.state.pool().expect("Store unavailable")
    }

    /// Forget the session cookie.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    pub async fn login(&mut self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/login",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        let raw = self.send(Method::GET, uri, None, Body::empty()).await;
        (raw.status, parse_json(&raw.body))
    }

    pub async fn post(&mut self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let raw = self
            .send(
                Method::POST,
                uri,
                Some("application/json".to_owned()),
                Body::from(body.to_string()),
            )
            .await;
        (raw.status, parse_json(&raw.body))
    }

    pub async fn get_raw(&mut self, uri: &str) -> RawResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    /// POST a multipart form with a single file part.
    pub async fn post_file(
        &mut self,
        uri: &str,
        field: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.db\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let raw = self
            .send(
                Method::POST,
                uri,
                Some(format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")),
                Body::from(body),
            )
            .await;
        (raw.status, parse_json(&raw.body))
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<String>,
        body: Body,
    ) -> RawResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("Set-Cookie is ASCII")
                .split(';')
                .next()
                .unwrap_or_default();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            headers,
            body,
        }
    }
}

/// Body as JSON, or `Value::Null` when it is empty or not JSON.
fn parse_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}
