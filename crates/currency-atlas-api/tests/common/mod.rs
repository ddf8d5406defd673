//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::TimeDelta;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use currency_atlas_api::app::build_router;
use currency_atlas_api::auth::{AdminCredentials, SessionRegistry};
use currency_atlas_api::state::AppState;
use currency_atlas_core::store::EventStore;
use currency_atlas_core::upload::BlobUploader;
use currency_atlas_registry::RegistryService;
use currency_atlas_registry::domain::admin::AdminAuthenticator;
use currency_atlas_registry::domain::palette::Palette;
use currency_atlas_store::{InMemoryEventStore, LocalBlobUploader};
use currency_atlas_test_support::{FixedClock, RecordingBlobUploader, fixed_now};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const MAX_UPLOAD_BYTES: usize = 1024;

/// A router plus handles on the collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryEventStore>,
    pub uploader: Arc<RecordingBlobUploader>,
    /// Directory served under `/files`; kept alive for the test's duration.
    pub upload_dir: TempDir,
}

fn assemble(store: Arc<dyn EventStore>, uploader: Arc<dyn BlobUploader>, upload_dir: &TempDir) -> Router {
    let clock = Arc::new(FixedClock(fixed_now()));
    let registry = RegistryService::new(
        clock.clone(),
        Arc::new(AdminAuthenticator::new(ADMIN_EMAIL)),
        uploader,
        store,
        Palette::standard(),
    );
    let state = AppState::new(
        registry,
        AdminCredentials::new(ADMIN_EMAIL, ADMIN_PASSWORD),
        SessionRegistry::new(clock, TimeDelta::hours(1)),
    );
    build_router(state, upload_dir.path(), MAX_UPLOAD_BYTES)
}

/// Build the full app router over an in-memory store, a recording uploader
/// and a fixed clock. Uses the same router as `main.rs`.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryEventStore::new());
    let uploader = Arc::new(RecordingBlobUploader::new());
    let upload_dir = TempDir::new().unwrap();
    let router = assemble(store.clone(), uploader.clone(), &upload_dir);
    TestApp {
        router,
        store,
        uploader,
        upload_dir,
    }
}

/// Build the app with a caller-supplied store, e.g. a failing double.
pub fn build_test_app_with_store(store: Arc<dyn EventStore>) -> (Router, TempDir) {
    let upload_dir = TempDir::new().unwrap();
    let router = assemble(store, Arc::new(RecordingBlobUploader::new()), &upload_dir);
    (router, upload_dir)
}

/// Build the app with a caller-supplied uploader, e.g. a failing double.
pub fn build_test_app_with_uploader(uploader: Arc<dyn BlobUploader>) -> (Router, TempDir) {
    let upload_dir = TempDir::new().unwrap();
    let router = assemble(Arc::new(InMemoryEventStore::new()), uploader, &upload_dir);
    (router, upload_dir)
}

/// Build the app with a `LocalBlobUploader` writing into the served directory.
pub fn build_test_app_with_local_uploads() -> (Router, TempDir) {
    let upload_dir = TempDir::new().unwrap();
    let uploader = Arc::new(LocalBlobUploader::new(
        upload_dir.path(),
        "http://localhost:3000",
    ));
    let router = assemble(Arc::new(InMemoryEventStore::new()), uploader, &upload_dir);
    (router, upload_dir)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Send a POST request with a JSON body, optionally with a bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a raw byte body, optionally with a bearer token.
pub async fn post_bytes(
    app: Router,
    uri: &str,
    bytes: Vec<u8>,
    content_type: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(bytes)).unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the raw body.
pub async fn get_bytes(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, body_bytes.to_vec())
}

/// Log in as the admin and return the bearer token.
pub async fn login(app: Router) -> String {
    let (status, json) = post_json(
        app,
        "/api/auth/login",
        &serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json["token"].as_str().unwrap().to_owned()
}

/// Save an event as the admin and assert success.
pub async fn save(app: Router, token: &str, country_code: &str, year: i32, reform_type: &str) {
    let (status, json) = post_json(
        app,
        "/api/save-event",
        &serde_json::json!({
            "countryCode": country_code,
            "year": year,
            "type": reform_type,
            "title": format!("{country_code} {year}"),
            "desc": "",
        }),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "save failed: {json}");
}
