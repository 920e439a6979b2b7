//! api.rs — HTTP surface: router, validation, and the sentinel error body.
//!
//! One real endpoint (`POST /api/analyze`) plus `/health`. The pipeline is
//! validate -> gateway -> normalize -> score; every path answers with a
//! complete record-shaped JSON body. A panic anywhere in the pipeline is
//! mapped to the fixed 500 sentinel instead of a bare error page.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::error;

use crate::gateway::{self, DynModelClient};
use crate::incident::AnalysisResult;
use crate::normalize::normalize_severity;
use crate::score::{calculate_confidence, VarianceSource};

/// Minimum trimmed description length accepted by the endpoint.
const MIN_DESCRIPTION_CHARS: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub classifier: DynModelClient,
    pub variance: Arc<dyn VarianceSource>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/analyze", post(analyze))
        .layer(CatchPanicLayer::custom(panic_sentinel))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    // Defaulted so a missing field lands in our 400, not a serde rejection.
    #[serde(default)]
    description: String,
}

#[derive(serde::Serialize)]
struct AnalyzeResp {
    #[serde(flatten)]
    result: AnalysisResult,
    /// Float in [0, 1]. Never an integer percentage.
    confidence: f64,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> impl IntoResponse {
    counter!("triage_analyze_requests_total").increment(1);

    if body.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        counter!("triage_rejected_inputs_total").increment(1);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid description" })),
        )
            .into_response();
    }

    let candidate = gateway::analyze_description(state.classifier.as_ref(), &body.description).await;
    let result = normalize_severity(candidate);
    let confidence = calculate_confidence(&result, state.variance.as_ref());

    Json(AnalyzeResp { result, confidence }).into_response()
}

/// Fixed body for an unexpected pipeline failure. Unlike the gateway
/// fallback, this one carries a hardcoded confidence: the scorer may be the
/// thing that blew up.
fn panic_sentinel(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(%detail, "analysis pipeline panicked, answering with sentinel");
    counter!("triage_pipeline_failures_total").increment(1);

    let body = json!({
        "urgency": "Medium",
        "category": "Other",
        "summary": "Service unavailable",
        "resources": [],
        "confidence": 0.4
    });

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("sentinel response")
}
