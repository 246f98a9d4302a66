#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use dreamtales_ai::{Completion, GeneratedImage, ProviderError, RetryPolicy, StoryProvider};
use dreamtales_api::auth::jwt::{generate_access_token, JwtConfig};
use dreamtales_api::config::{GenerationConfig, ServerConfig};
use dreamtales_api::router::build_app_router;
use dreamtales_api::state::AppState;
use dreamtales_core::prompt::ChatPrompt;
use dreamtales_core::status::SubscriptionTier;
use dreamtales_db::repositories::ProfileRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Completion returned when nothing else was scripted.
pub const DEFAULT_STORY: &str = "The Sleepy Owl\n\n\
Once upon a time, a little owl could not fall asleep.\n\n\
She counted the stars one by one until her eyes grew heavy.\n\n\
And with a soft hoot, she drifted off to sleep. The end.";

// ---------------------------------------------------------------------------
// Fake provider
// ---------------------------------------------------------------------------

/// Scripted [`StoryProvider`]. Queued results are returned first; once a
/// queue is empty, calls succeed with canned data.
#[derive(Default)]
pub struct FakeProvider {
    completions: Mutex<VecDeque<Result<String, ProviderError>>>,
    images: Mutex<VecDeque<Result<GeneratedImage, ProviderError>>>,
    /// Every completion prompt received, in order.
    pub prompts: Mutex<Vec<ChatPrompt>>,
    pub image_calls: AtomicU32,
    pub speech_calls: AtomicU32,
    completion_delay: Mutex<Duration>,
}

pub fn api_error(status: u16) -> ProviderError {
    ProviderError::Api {
        status,
        body: "scripted failure".to_string(),
    }
}

impl FakeProvider {
    pub fn push_completion(&self, text: &str) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn fail_completion(&self, status: u16) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Err(api_error(status)));
    }

    /// Hold every later completion for `delay` before answering.
    pub fn delay_completions(&self, delay: Duration) {
        *self.completion_delay.lock().unwrap() = delay;
    }

    /// Make the next `times` image calls fail with `status`.
    pub fn fail_images(&self, status: u16, times: usize) {
        let mut images = self.images.lock().unwrap();
        for _ in 0..times {
            images.push_back(Err(api_error(status)));
        }
    }

    pub fn image_calls(&self) -> u32 {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn completion_calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> ChatPrompt {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no completion prompt recorded")
    }
}

#[async_trait]
impl StoryProvider for FakeProvider {
    async fn complete(
        &self,
        prompt: &ChatPrompt,
        _temperature: f32,
    ) -> Result<Completion, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let delay = *self.completion_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let next = self.completions.lock().unwrap().pop_front();
        let text = next.unwrap_or_else(|| Ok(DEFAULT_STORY.to_string()))?;
        Ok(Completion {
            text,
            finish_reason: Some("stop".to_string()),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let n = self.image_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.images.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(GeneratedImage {
                url: Some(format!("https://images.example/{n}.png")),
                b64_json: None,
                revised_prompt: Some(prompt.to_string()),
            })
        })
    }

    async fn synthesize_speech(&self, _text: &str, _voice: &str) -> Result<Vec<u8>, ProviderError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        Ok(b"ID3fake-mp3".to_vec())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        audience: Some("authenticated".to_string()),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults and no retry or
/// inter-image delays.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        generation: GenerationConfig {
            temperature: 0.8,
            image_retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::ZERO,
            },
            image_request_delay: Duration::ZERO,
        },
    }
}

/// Build the full application router backed by `provider`.
pub fn build_app(pool: PgPool, provider: Option<Arc<FakeProvider>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        provider: provider.map(|p| p as Arc<dyn StoryProvider>),
    };
    build_app_router(state, &config)
}

/// Build the application with a fresh fake provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, Some(Arc::new(FakeProvider::default())))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, Some("parent@example.com"), &test_jwt_config())
        .expect("token generation should succeed")
}

/// A fresh user with a profile on `tier`, and a bearer token for it.
pub async fn new_user(pool: &PgPool, tier: SubscriptionTier) -> (Uuid, String) {
    let id = Uuid::new_v4();
    ProfileRepo::ensure(pool, id, Some("parent@example.com"))
        .await
        .unwrap();
    ProfileRepo::set_tier(pool, id, tier).await.unwrap();
    (id, token_for(id))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status, then return the `data` field of a success envelope.
pub async fn expect_data(response: Response, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    assert_eq!(json["success"], true);
    json["data"].clone()
}

/// Assert the status, then return the `code` of an error envelope.
pub async fn expect_error(response: Response, status: StatusCode) -> String {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    assert_eq!(json["success"], false);
    json["code"].as_str().unwrap_or_default().to_string()
}
