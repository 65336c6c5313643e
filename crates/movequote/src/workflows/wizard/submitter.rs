use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workflows::quote::PhotoAttachment;

/// Photo encoded for transport inside the quote payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFile {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(alias = "dataUrl", default)]
    pub base64: String,
}

impl PhotoFile {
    pub fn encode(photo: &PhotoAttachment) -> Self {
        Self {
            name: photo.filename.clone(),
            content_type: photo.resolved_content_type(),
            base64: STANDARD.encode(&photo.bytes),
        }
    }

    /// Raw base64 content with any `data:<mime>;base64,` prefix removed.
    pub fn raw_base64(&self) -> &str {
        match self.base64.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => self.base64.as_str(),
        }
    }
}

/// Body posted to the quote endpoint when a visitor finishes the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_range: Option<String>,
    pub photo_files: Vec<PhotoFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("quote endpoint unreachable: {0}")]
    Transport(String),
    #[error("quote endpoint answered with status {status}")]
    Rejected { status: u16 },
}

/// Outbound collaborator that carries a finished quote to the crew.
#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit(&self, payload: QuotePayload) -> Result<(), DeliveryError>;
}

/// Posts quote payloads as JSON; any 2xx answer counts as delivered.
#[derive(Debug, Clone)]
pub struct HttpQuoteSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuoteSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuoteSubmitter for HttpQuoteSubmitter {
    async fn submit(&self, payload: QuotePayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(endpoint = %self.endpoint, %status, "quote endpoint answered");
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
