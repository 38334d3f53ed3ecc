#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::AuthSettings;
use serde_json::Value;
use tower::ServiceExt;

use server::{build_router, ServerState};
use service::auth::domain::CreateAdminInput;
use service::auth::repository::mock::MockAuthRepository;
use service::records::repository::mock::InMemoryRecordRepository;

pub const SECRET: &str = "http-test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "CorrectHorse1";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    pub records: Arc<InMemoryRecordRepository>,
    pub admin_id: String,
}

pub async fn app() -> TestApp {
    app_with(AuthSettings { jwt_secret: SECRET.into(), ..Default::default() }).await
}

/// Router over in-memory stores with one seeded admin.
pub async fn app_with(settings: AuthSettings) -> TestApp {
    let records = Arc::new(InMemoryRecordRepository::new());
    let auth = Arc::new(MockAuthRepository::default());
    let state = ServerState::new(auth, records.clone(), &settings);
    let seed = CreateAdminInput { email: ADMIN_EMAIL.into(), password: ADMIN_PASSWORD.into() };
    let admin = state
        .auth
        .create_admin(seed)
        .await
        .expect("seed admin");
    let router = build_router(state.clone(), tower_http::cors::CorsLayer::very_permissive());
    TestApp { router, state, records, admin_id: admin.id }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.router.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
    (status, bytes.to_vec())
}

pub async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, req).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        b = b.header("authorization", format!("Bearer {t}"));
    }
    b.body(Body::empty()).expect("request")
}

/// GET `uri` with a bearer token and decode the JSON answer.
pub async fn fetch(app: &TestApp, uri: &str, token: &str) -> (StatusCode, Value) {
    send_json(app, get(uri, Some(token))).await
}

pub fn get_with_auth_header(uri: &str, header: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", header)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn login_token(app: &TestApp) -> String {
    let creds = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let (status, body) = send_json(app, post_json("/api/auth/login", creds)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Percent-encode a query value.
pub fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
