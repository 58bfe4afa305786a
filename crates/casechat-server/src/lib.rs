use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use casechat_core::{answer::Answerer, config::Config, transport::JsonTransport};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod pages;
pub mod routes;

/// Uploaded legal documents can be large; axum's 2 MB default is too small.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub config: Arc<Config>,
    pub transport: Arc<dyn JsonTransport>,
    pub answerer: Arc<dyn Answerer>,
}

impl AppState {
    pub fn new(
        config: Config,
        transport: Arc<dyn JsonTransport>,
        answerer: Arc<dyn Answerer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            answerer,
        }
    }
}

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = config.cors_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };
    let origin: HeaderValue = origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn router(state: Arc<AppState>) -> Result<Router> {
    let cors = cors_layer(&state.config)?;
    Ok(Router::new()
        // API
        .route("/api/health", get(routes::health))
        .route("/api/ask", post(routes::ask))
        // Pages
        .route("/", get(routes::landing))
        .route("/chat/ask", get(routes::question_page).post(routes::submit_question))
        .route("/chat/qna", get(routes::qna_page).post(routes::submit_qna))
        .route(
            "/chat/retriever",
            get(routes::retriever_page).post(routes::submit_retriever),
        )
        .route(
            "/chat/summarizer",
            get(routes::summarizer_page).post(routes::submit_summarizer),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
