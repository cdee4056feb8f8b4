//! Shared harness for HTTP-level integration tests.
//!
//! Builds the full application router -- same middleware stack as
//! production -- on top of the in-memory store and a scripted inference
//! endpoint, plus the usual request/response helpers over
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use cardsmith_inference::client::{CompletionClient, CompletionError};
use cardsmith_inference::{FlashcardGenerator, GroqConfig};
use cardsmith_store::{FirestoreConfig, MemoryStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

use cardsmith_api::auth::session::SessionConfig;
use cardsmith_api::config::AppConfig;
use cardsmith_api::router::build_app_router;
use cardsmith_api::state::AppState;

/// What the scripted inference endpoint does on every call.
#[derive(Clone)]
pub enum Script {
    /// Return this completion text.
    Respond(String),
    /// Fail with this HTTP status.
    Status(u16),
}

struct ScriptedClient(Script);

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        match &self.0 {
            Script::Respond(text) => Ok(text.clone()),
            Script::Status(status) => Err(CompletionError::Api {
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }
}

/// Build a test `AppConfig` with safe defaults and a known session secret.
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        debug: false,
        cards_per_set: 8,
        limits: cardsmith_core::GenerationLimits::default(),
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            expiry_days: 7,
        },
        groq: GroqConfig {
            api_key: None,
            model: "test-model".to_string(),
            base_url: "http://localhost:0".to_string(),
            timeout_secs: 30,
        },
        firestore: FirestoreConfig {
            project_id: None,
            credentials_path: "firebase_key.json".to_string(),
        },
    }
}

/// Build the application with a scripted inference endpoint.
pub fn build_test_app(script: Script) -> Router {
    build_app(Some(script))
}

/// Build the application with generation disabled (no API key configured).
pub fn build_test_app_generation_disabled() -> Router {
    build_app(None)
}

fn build_app(script: Option<Script>) -> Router {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());

    let generator = script.map(|script| {
        Arc::new(FlashcardGenerator::new(Arc::new(ScriptedClient(script))))
    });

    let state = AppState {
        config: Arc::new(config.clone()),
        users: store.clone(),
        sets: store,
        generator,
        store_label: "memory",
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario helpers
// ---------------------------------------------------------------------------

/// Register a user via the API and return their session token.
pub async fn register_and_token(app: Router, email: &str) -> String {
    let body = serde_json::json!({
        "email": email,
        "password": "a-decent-password",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// A well-formed completion payload with `n` question/answer pairs.
pub fn json_cards(n: usize) -> String {
    let cards: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"question": "Question {i}?", "answer": "Answer {i}."}}"#))
        .collect();
    format!(r#"{{"flashcards": [{}]}}"#, cards.join(","))
}
