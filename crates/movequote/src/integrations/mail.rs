use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "content")]
pub enum EmailBody {
    Text(String),
    Html(String),
}

impl EmailBody {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(body) | Self::Html(body) => body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_base64: String,
    pub content_type: Option<String>,
}

/// Provider-neutral outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: EmailBody,
    pub attachments: Vec<EmailAttachment>,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: EmailBody,
    ) -> Self {
        Self {
            from: from.into(),
            to,
            cc: Vec::new(),
            subject: subject.into(),
            body,
            attachments: Vec::new(),
        }
    }

    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<EmailAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageId(pub String);

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email provider is not configured")]
    NotConfigured,
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// The single send-message seam every lead handler goes through.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<MessageId, MailError>;
}

/// Transactional e-mail through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: RESEND_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("endpoint", &self.endpoint)
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    #[serde(default)]
    id: Option<String>,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<MessageId, MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::NotConfigured)?;
        let body = resend_request_body(&message);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                error!(?err, "failed to reach email provider");
                MailError::Transport(err.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!(?status, body = %text, "email provider returned an error");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let id = serde_json::from_str::<ResendResponse>(&text)
            .ok()
            .and_then(|parsed| parsed.id)
            .unwrap_or_default();
        debug!(message_id = %id, subject = %message.subject, "email accepted by provider");
        Ok(MessageId(id))
    }
}

pub(crate) fn resend_request_body(message: &EmailMessage) -> Value {
    let mut body = json!({
        "from": message.from,
        "to": message.to,
        "subject": message.subject,
    });

    match &message.body {
        EmailBody::Text(text) => body["text"] = json!(text),
        EmailBody::Html(html) => body["html"] = json!(html),
    }

    if !message.cc.is_empty() {
        body["cc"] = json!(message.cc);
    }

    if !message.attachments.is_empty() {
        let attachments: Vec<Value> = message
            .attachments
            .iter()
            .map(|attachment| {
                let mut entry = json!({
                    "filename": attachment.filename,
                    "content": attachment.content_base64,
                });
                if let Some(content_type) = &attachment.content_type {
                    entry["content_type"] = json!(content_type);
                }
                entry
            })
            .collect();
        body["attachments"] = Value::Array(attachments);
    }

    body
}
