use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::services::question_gen::QuestionGenerator;

/// Serializes tests that mutate process environment variables.
pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn set_test_env() {
    std::env::set_var("QUIZFORGE_ENV", "test");
    std::env::set_var("QUIZFORGE_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", "test-secret");
    std::env::remove_var("PROMETHEUS_ENABLED");
    std::env::remove_var("API_PREFIX");
    std::env::remove_var("DATABASE_URL");
}

/// State backed by a lazily-connecting pool; usable for routes that do not
/// touch the database.
pub(crate) fn build_test_state() -> AppState {
    let settings = Settings::load().expect("settings");
    let db = sqlx::PgPool::connect_lazy(&settings.database().database_url()).expect("lazy pool");
    let generator = QuestionGenerator::from_settings(&settings).expect("generator");
    AppState::new(settings, db, generator)
}

pub(crate) fn build_test_app() -> Router {
    api::router::router(build_test_state())
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
