//! HTTP routes for the polarity service.
//!
//! - `POST /analyze`: score a text and store the result
//! - `GET /history`: the most recent results, newest first
//! - `GET /health`: liveness plus store reachability

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::analysis::AnalysisService;
use crate::error::{RequestError, ServiceError};
use crate::record::SentimentRecord;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const SERVICE_NAME: &str = "polarity-service";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub data: SentimentRecord,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<SentimentRecord>,
    pub count: usize,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Pull a non-blank `text` string out of an arbitrary JSON body.
fn extract_text(body: &Value) -> Result<&str, RequestError> {
    body.get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or(RequestError::TextRequired)
}

async fn analyze(
    State(service): State<Arc<AnalysisService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ServiceError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Unparseable analyze body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RequestError::BodyTooLarge
        } else {
            RequestError::NotJson
        }
    })?;

    let text = extract_text(&body)?;
    let record = service.analyze(text).await?;

    Ok(Json(AnalyzeResponse {
        data: record,
        status: "success",
    }))
}

async fn history(
    State(service): State<Arc<AnalysisService>>,
) -> Result<Json<HistoryResponse>, ServiceError> {
    let records = service.history().await?;

    Ok(Json(HistoryResponse {
        count: records.len(),
        data: records,
        status: "success",
    }))
}

async fn health(State(service): State<Arc<AnalysisService>>) -> Json<HealthResponse> {
    let store = service.store_reachable().await;

    Json(HealthResponse {
        status: if store { "healthy" } else { "degraded" },
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}

// ============================================================================
// Router
// ============================================================================

/// Build the service router. Every route allows any origin.
///
/// The body limit sits outside CORS: declared oversize bodies are refused
/// with a bare 413 before CORS runs.
pub fn build_router(service: Arc<AnalysisService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(analyze))
        .route("/history", get(history))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors),
        )
        .with_state(service)
}
