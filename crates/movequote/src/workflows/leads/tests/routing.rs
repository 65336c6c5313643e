use super::common::*;

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::leads::router::{client_context, quote_handler};
use crate::workflows::leads::{
    lead_router, DeliveryFailurePolicy, LeadLog, LeadService, LeadSettings,
};

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn raw_request(uri: &str, content_type: &str, body: &'static str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

fn json_bytes(body: Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&body).unwrap())
}

fn strict_settings() -> LeadSettings {
    let mut settings = LeadSettings::default();
    settings.quote.failure_policy = DeliveryFailurePolicy::Strict;
    settings
}

#[tokio::test]
async fn quote_route_answers_ok_even_when_fields_missing() {
    let (service, mailer, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/quote", json!({ "name": "Sam" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], json!(true));
    assert_eq!(payload["warning"], json!("missing_fields"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn quote_route_accepts_browser_photo_payload() {
    let (service, mailer, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/quote",
            json!({
                "type": "quiz",
                "name": "Sam",
                "email": "sam@example.com",
                "phone": "",
                "service": "Junk removal – Quiz Funnel",
                "details": "Job type: Junk removal",
                "estimateRange": "$300 – $900",
                "photoFiles": [
                    { "name": "pile.png", "type": "image/png", "dataUrl": "data:image/png;base64,AAAA" }
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "ok": true }));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].attachments[0].filename, "pile.png");
    assert_eq!(sent[0].attachments[0].content_base64, "AAAA");
}

#[tokio::test]
async fn quote_route_treats_unreadable_bodies_as_missing_fields() {
    let bodies = [
        raw_request("/api/quote", "application/json", "{not json"),
        raw_request("/api/quote", "text/plain", "{}"),
        raw_request("/api/quote", "application/json", r#"{"name": 5}"#),
        Request::post("/api/quote").body(Body::empty()).unwrap(),
    ];

    for request in bodies {
        let (service, mailer, _, _) = build_service();
        let response = lead_router(Arc::new(service))
            .oneshot(request)
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload, json!({ "ok": true, "warning": "missing_fields" }));
        assert!(mailer.sent().is_empty());
    }
}

#[tokio::test]
async fn strict_quote_route_answers_bad_request_for_unreadable_body() {
    let (service, _, _, _) = build_service_with(strict_settings());

    let response = lead_router(Arc::new(service))
        .oneshot(raw_request("/api/quote", "text/plain", "{not json"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], json!(false));
}

#[tokio::test]
async fn strict_quote_handler_reports_missing_fields_as_bad_request() {
    let (service, _, _, _) = build_service_with(strict_settings());

    let response = quote_handler::<RecordingMailer, FakeGateway, MemoryLeadLog>(
        State(Arc::new(service)),
        json_bytes(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], json!(false));
    assert_eq!(payload["error"], json!("Missing required quote fields"));
}

#[tokio::test]
async fn strict_quote_handler_reports_mail_failure_as_server_error() {
    let service = failing_service(MailFailure::Rejected, strict_settings());

    let response = quote_handler::<FailingMailer, FakeGateway, MemoryLeadLog>(
        State(Arc::new(service)),
        json_bytes(json!({
            "name": "Sam",
            "email": "sam@example.com",
            "service": "Residential move",
            "details": "Two bedroom"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Failed to send quote emails"));
}

#[tokio::test]
async fn quote_get_reports_alive() {
    let (service, _, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(Request::get("/api/quote").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("quote API alive"));
}

#[tokio::test]
async fn promo_route_rejects_bad_email() {
    let (service, _, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/promo", json!({ "email": "nope" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], json!(false));
    assert_eq!(payload["error"], json!("Valid email is required"));
}

#[tokio::test]
async fn subscribe_route_returns_code_in_camel_case() {
    let (service, _, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/subscribe",
            json!({ "email": "kim@example.com" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("KREW25"));
    assert_eq!(payload["emailSent"], json!(true));
}

#[tokio::test]
async fn checkout_route_returns_client_secret() {
    let (service, _, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/create-checkout-session",
            json!({
                "email": "kim@example.com",
                "service": "Residential move",
                "date": "2026-12-01",
                "timeWindow": "morning"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["clientSecret"], json!("pi_test_123_secret_abc"));
}

#[tokio::test]
async fn checkout_route_maps_errors_to_statuses() {
    let (service, _, _, _) = build_service();
    let response = lead_router(Arc::new(service))
        .oneshot(json_request(
            "/api/create-checkout-session",
            json!({ "email": "kim@example.com" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unconfigured = LeadService::new(
        Arc::new(RecordingMailer::default()),
        Arc::new(UnconfiguredGateway),
        Arc::new(MemoryLeadLog::default()),
        LeadSettings::default(),
    );
    let body = json!({
        "email": "kim@example.com",
        "service": "Residential move",
        "date": "2026-12-01"
    });
    let response = lead_router(Arc::new(unconfigured))
        .oneshot(json_request("/api/create-checkout-session", body.clone()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let declining = LeadService::new(
        Arc::new(RecordingMailer::default()),
        Arc::new(DecliningGateway),
        Arc::new(MemoryLeadLog::default()),
        LeadSettings::default(),
    );
    let response = lead_router(Arc::new(declining))
        .oneshot(json_request("/api/create-checkout-session", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn checklist_download_redirects_to_pdf() {
    let (service, _, _, _) = build_service();
    let url = service.checklist_url().to_string();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/checklist-download?email=robin%40example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(url.as_str())
    );
}

#[tokio::test]
async fn checklist_lead_route_captures_forwarded_ip() {
    let (service, _, _, leads) = build_service();
    let router = lead_router(Arc::new(service));

    let request = Request::post("/api/log-checklist-lead")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header(header::USER_AGENT, "Safari")
        .body(Body::from(
            serde_json::to_vec(&json!({
                "email": "robin@example.com",
                "source": "footer",
                "utm": { "utm_campaign": "spring" }
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let logged = leads.recent(1).expect("log readable");
    assert_eq!(logged[0].ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(logged[0].user_agent.as_deref(), Some("Safari"));
    assert_eq!(logged[0].source, "footer");
}

#[tokio::test]
async fn apply_route_always_acknowledges() {
    let service = failing_service(MailFailure::NotConfigured, LeadSettings::default());
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/apply",
            json!({ "name": "Alex", "role": "Driver", "notes": "CDL" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "ok": true, "emailSent": false }));
}

#[tokio::test]
async fn ping_route_responds() {
    let (service, _, _, _) = build_service();
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn client_context_ignores_blank_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("  "));

    let client = client_context(&headers);

    assert_eq!(client.ip, None);
    assert_eq!(client.user_agent, None);
}
