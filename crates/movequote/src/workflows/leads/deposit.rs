use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::repository::LeadLog;
use super::service::{non_empty, LeadService};
use crate::integrations::{Mailer, PaymentError, PaymentGateway, PaymentIntentRequest};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepositRequest {
    pub email: String,
    pub service: String,
    pub date: String,
    pub time_window: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSession {
    pub client_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    #[error("Missing required fields")]
    MissingFields,
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    /// Opens a card-payment intent for the fixed move-date deposit.
    pub async fn create_deposit(
        &self,
        request: DepositRequest,
    ) -> Result<DepositSession, DepositError> {
        let (Some(email), Some(service), Some(date)) = (
            non_empty(&request.email),
            non_empty(&request.service),
            non_empty(&request.date),
        ) else {
            return Err(DepositError::MissingFields);
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("kind".to_string(), "move_deposit".to_string());
        metadata.insert("service".to_string(), service.to_string());
        metadata.insert("date".to_string(), date.to_string());
        metadata.insert(
            "timeWindow".to_string(),
            request.time_window.trim().to_string(),
        );

        let deposit = &self.settings.deposit;
        let intent = self
            .payments
            .create_payment_intent(PaymentIntentRequest {
                amount_cents: deposit.amount_cents,
                currency: deposit.currency.clone(),
                receipt_email: email.to_string(),
                metadata,
            })
            .await?;

        info!(payment_intent = %intent.id, service, date, "deposit payment intent created");
        Ok(DepositSession {
            client_secret: intent.client_secret,
        })
    }
}
