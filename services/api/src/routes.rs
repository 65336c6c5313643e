use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use movequote::integrations::{Mailer, PaymentGateway};
use movequote::workflows::leads::{lead_router, LeadLog, LeadService};
use movequote::workflows::quote::IntakeRecord;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct EstimateResponse {
    pub(crate) low: u32,
    pub(crate) high: u32,
    pub(crate) range: String,
    pub(crate) policy: &'static str,
}

pub(crate) fn with_lead_routes<M, P, L>(service: Arc<LeadService<M, P, L>>) -> axum::Router
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    lead_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/estimate", axum::routing::post(estimate_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Prices an intake record the same way the wizard does on submit.
pub(crate) async fn estimate_endpoint(
    Extension(state): Extension<AppState>,
    Json(record): Json<IntakeRecord>,
) -> Json<EstimateResponse> {
    let estimate = state.estimate_policy.estimate(&record);
    Json(EstimateResponse {
        low: estimate.low,
        high: estimate.high,
        range: estimate.display_range(),
        policy: state.estimate_policy.label(),
    })
}
