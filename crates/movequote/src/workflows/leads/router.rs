use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use super::checklist::{ChecklistError, ChecklistLeadRequest, ChecklistRequest};
use super::deposit::{DepositError, DepositRequest};
use super::hiring::HiringApplication;
use super::promo::{PromoError, PromoRequest};
use super::quote::{QuoteRequest, QuoteWarning};
use super::repository::{ClientContext, LeadLog};
use super::service::LeadService;
use super::settings::DeliveryFailurePolicy;
use crate::integrations::{MailError, Mailer, PaymentError, PaymentGateway};

/// Router builder exposing the lead capture endpoints used by the marketing site.
pub fn lead_router<M, P, L>(service: Arc<LeadService<M, P, L>>) -> Router
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    Router::new()
        .route(
            "/api/quote",
            post(quote_handler::<M, P, L>).get(quote_alive_handler),
        )
        .route("/api/subscribe", post(promo_handler::<M, P, L>))
        .route("/api/promo", post(promo_handler::<M, P, L>))
        .route(
            "/api/create-checkout-session",
            post(deposit_handler::<M, P, L>),
        )
        .route("/api/send-checklist", post(send_checklist_handler::<M, P, L>))
        .route(
            "/api/checklist-download",
            get(checklist_download_handler::<M, P, L>),
        )
        .route(
            "/api/log-checklist-lead",
            post(checklist_lead_handler::<M, P, L>),
        )
        .route("/api/apply", post(apply_handler::<M, P, L>))
        .route("/api/ping", get(ping_handler))
        .with_state(service)
}

/// Unreadable bodies (bad JSON, wrong content type, mistyped fields) are
/// treated as an empty request so the failure policy picks the status.
pub(crate) async fn quote_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    body: Bytes,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    let request = serde_json::from_slice::<QuoteRequest>(&body).unwrap_or_else(|err| {
        warn!(error = %err, "unreadable quote body; treating as empty");
        QuoteRequest::default()
    });
    let delivery = service.deliver_quote(request).await;
    let policy = service.settings().quote.failure_policy;

    match (delivery.warning, policy) {
        (None, _) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        (Some(warning), DeliveryFailurePolicy::AlwaysOk) => {
            let payload = json!({
                "ok": true,
                "warning": warning.code(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        (Some(warning), DeliveryFailurePolicy::Strict) => {
            let status = match warning {
                QuoteWarning::MissingFields => StatusCode::BAD_REQUEST,
                QuoteWarning::MailNotConfigured | QuoteWarning::SendFailed => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({
                "ok": false,
                "error": warning.message(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

async fn quote_alive_handler() -> Response {
    let payload = json!({
        "ok": true,
        "message": "quote API alive",
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn promo_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<PromoRequest>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    let client = client_context(&headers);
    match service.subscribe(request, &client).await {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(PromoError::InvalidEmail) => {
            let payload = json!({
                "ok": false,
                "error": PromoError::InvalidEmail.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn deposit_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    axum::Json(request): axum::Json<DepositRequest>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    match service.create_deposit(request).await {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(DepositError::MissingFields) => {
            let payload = json!({
                "error": DepositError::MissingFields.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(DepositError::Payment(PaymentError::NotConfigured)) => {
            error!("payment provider key is missing; deposit checkout unavailable");
            let payload = json!({
                "error": "Payments are not configured",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "deposit checkout failed");
            let payload = json!({
                "error": "Internal server error",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn send_checklist_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    axum::Json(request): axum::Json<ChecklistRequest>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    match service.send_checklist(request).await {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(ChecklistError::MissingEmail) => {
            let payload = json!({
                "error": ChecklistError::MissingEmail.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(ChecklistError::Mail(MailError::NotConfigured)) => {
            error!("email provider key is missing; checklist not sent");
            let payload = json!({
                "error": "Email service not configured",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(ChecklistError::Mail(other)) => {
            error!(error = %other, "checklist email failed");
            let payload = json!({
                "error": "Failed to send email",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DownloadQuery {
    email: Option<String>,
}

pub(crate) async fn checklist_download_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    headers: HeaderMap,
    Query(query): Query<DownloadQuery>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    let client = client_context(&headers);
    let location = service
        .record_checklist_download(query.email.as_deref(), &client)
        .to_string();
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub(crate) async fn checklist_lead_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ChecklistLeadRequest>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    let client = client_context(&headers);
    service.record_checklist_lead(request, &client);
    (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response()
}

pub(crate) async fn apply_handler<M, P, L>(
    State(service): State<Arc<LeadService<M, P, L>>>,
    axum::Json(application): axum::Json<HiringApplication>,
) -> Response
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    let receipt = service.submit_application(application).await;
    (StatusCode::OK, axum::Json(receipt)).into_response()
}

async fn ping_handler() -> Response {
    (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response()
}

/// First `x-forwarded-for` hop and the user agent, when present.
pub(crate) fn client_context(headers: &HeaderMap) -> ClientContext {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    ClientContext {
        ip: header_str("x-forwarded-for")
            .and_then(|raw| raw.split(',').next())
            .map(|ip| ip.trim().to_string()),
        user_agent: header_str("user-agent").map(str::to_string),
    }
}
