//! HTTP server for GitHub webhooks.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use notify::{BotKey, ChannelResponse};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::RelayError;
use crate::events::{DELIVERY_HEADER, EVENT_HEADER};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Arc<Config>,
    /// Event dispatcher.
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the HTTP router for the relay service.
///
/// `POST /` and `POST /webhooks/github` accept GitHub deliveries. Any other
/// method or path answers with the usage message.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(github_webhook_handler).fallback(usage_handler))
        .route(
            "/webhooks/github",
            post(github_webhook_handler).fallback(usage_handler),
        )
        .route("/health", get(health_check))
        .fallback(usage_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query parameters of a webhook delivery.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    /// Bot key of the destination chat group
    #[serde(default)]
    pub key: Option<String>,
}

/// Handle an incoming GitHub webhook.
pub async fn github_webhook_handler(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Outcome, RelayError> {
    let event_type = header_str(&headers, EVENT_HEADER).unwrap_or("unknown");
    let delivery_id = header_str(&headers, DELIVERY_HEADER).unwrap_or("unknown");

    info!(
        event_type = %event_type,
        delivery_id = %delivery_id,
        "Received GitHub webhook"
    );

    let key = query.key.and_then(BotKey::new);

    state
        .dispatcher
        .handle(event_type, key.as_ref(), &body)
        .await
        .inspect_err(|e| {
            warn!(
                event_type = %event_type,
                delivery_id = %delivery_id,
                error = %e,
                "Rejected GitHub webhook"
            );
        })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Static usage message for non-webhook requests.
async fn usage_handler(State(state): State<AppState>) -> String {
    state.config.usage_message()
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Delivered(ChannelResponse::Json(value)) => Json(value).into_response(),
            Self::Delivered(ChannelResponse::Text(text)) | Self::Skipped(text) => {
                text.into_response()
            }
        }
    }
}
