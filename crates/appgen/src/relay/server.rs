use super::{upstream, RelayConfig, LEGACY_PROXY_PATH, PROXY_PATH};
use crate::prelude::*;
use appgen_core::envelope::ProxyEnvelope;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    middleware,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared by every handler: the config and one pooled HTTP client.
#[derive(Debug, Clone)]
pub struct RelayState {
    config: Arc<RelayConfig>,
    client: reqwest::Client,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

pub fn router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(PROXY_PATH, post(proxy_handler))
        .route(LEGACY_PROXY_PATH, post(proxy_handler))
        .route("/health", get(health_handler))
        // Page captures travel inline as data URLs; bodies are forwarded uncapped.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(middleware::map_response(preflight_no_content))
        .with_state(state)
}

async fn proxy_handler(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Response, Error> {
    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| Error::Internal(f!("Failed to parse request body: {e}")))?;

    let mut envelope = ProxyEnvelope::split(payload)?;
    envelope.apply_overrides(&state.config.overrides);

    upstream::forward(&state.client, &state.config.upstream_url, envelope).await
}

#[derive(Debug, serde::Serialize)]
struct Health {
    status: &'static str,
}

async fn health_handler() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// The CORS layer answers preflights with `200`; the relay contract is `204`.
async fn preflight_no_content(method: Method, mut response: Response) -> Response {
    if method == Method::OPTIONS && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
