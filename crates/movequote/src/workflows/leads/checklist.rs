use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::repository::{ClientContext, LeadEntry, LeadLog};
use super::service::{escape_html, non_empty, LeadService};
use crate::integrations::{EmailBody, EmailMessage, MailError, Mailer, MessageId, PaymentGateway};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChecklistRequest {
    pub email: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChecklistLeadRequest {
    pub email: Option<String>,
    pub source: Option<String>,
    pub utm: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("Email required")]
    MissingEmail,
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    pub fn checklist_url(&self) -> &str {
        &self.settings.checklist.url
    }

    /// E-mails the moving-day checklist link.
    pub async fn send_checklist(
        &self,
        request: ChecklistRequest,
    ) -> Result<MessageId, ChecklistError> {
        let email = non_empty(&request.email).ok_or(ChecklistError::MissingEmail)?;
        let source = request
            .source
            .as_deref()
            .and_then(non_empty)
            .unwrap_or("unknown");

        let url = escape_html(self.checklist_url());
        let html = format!(
            "<h2>Your Moving Day Checklist</h2>\
<p>Thanks for requesting our professional, mover-approved checklist.</p>\
<p><a href=\"{url}\" target=\"_blank\">Click here to download your checklist</a></p>\
<p style=\"font-size:12px;color:#666;\">Source: {source}</p>",
            source = escape_html(source),
        );

        let message = EmailMessage::new(
            self.settings.checklist.from.clone(),
            vec![email.to_string()],
            "Your Moving Day Checklist",
            EmailBody::Html(html),
        );

        let id = self.mailer.send(message).await?;
        info!(email, source, "checklist email sent");
        Ok(id)
    }

    /// Logs a checklist download click and returns where to redirect.
    pub fn record_checklist_download(&self, email: Option<&str>, client: &ClientContext) -> &str {
        info!(
            email = email.and_then(non_empty).unwrap_or("unknown"),
            user_agent = client.user_agent.as_deref().unwrap_or("unknown"),
            "checklist pdf clicked"
        );
        self.checklist_url()
    }

    pub fn record_checklist_lead(
        &self,
        request: ChecklistLeadRequest,
        client: &ClientContext,
    ) -> LeadEntry {
        let email = request
            .email
            .as_deref()
            .and_then(non_empty)
            .map(str::to_string);
        let source = request
            .source
            .as_deref()
            .and_then(non_empty)
            .unwrap_or("unknown")
            .to_string();
        let utm = if request.utm.is_null() {
            Value::Object(Default::default())
        } else {
            request.utm
        };
        self.log_lead(email, &source, utm, client)
    }
}
