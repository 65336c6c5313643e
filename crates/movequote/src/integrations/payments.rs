use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::error;

pub const STRIPE_PAYMENT_INTENTS_ENDPOINT: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    pub amount_cents: u32,
    pub currency: String,
    pub receipt_email: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider is not configured")]
    NotConfigured,
    #[error("payment provider unreachable: {0}")]
    Transport(String),
    #[error("payment provider rejected the request with status {status}")]
    Rejected { status: u16, body: String },
    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// Creates the card-payment intent that collects a move-date deposit.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: Option<String>,
    endpoint: String,
}

impl StripeGateway {
    pub fn new(secret_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            endpoint: STRIPE_PAYMENT_INTENTS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("endpoint", &self.endpoint)
            .field("configured", &self.secret_key.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(secret_key)
            .form(&payment_intent_form(&request))
            .send()
            .await
            .map_err(|err| {
                error!(?err, "failed to talk to stripe");
                PaymentError::Transport(err.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| PaymentError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!(?status, body = %body, "stripe returned an error");
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            error!(?err, body = %body, "failed to parse stripe payment intent");
            PaymentError::InvalidResponse(err.to_string())
        })
    }
}

pub(crate) fn payment_intent_form(request: &PaymentIntentRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount_cents.to_string()),
        ("currency".to_string(), request.currency.clone()),
        ("receipt_email".to_string(), request.receipt_email.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}
