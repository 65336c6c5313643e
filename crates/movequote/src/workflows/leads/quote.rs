use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::repository::LeadLog;
use super::service::{non_empty, LeadService};
use crate::integrations::{
    EmailAttachment, EmailBody, EmailMessage, MailError, Mailer, MessageId, PaymentGateway,
};
use crate::workflows::wizard::PhotoFile;

/// Quote request as posted by the wizard (or any older form variant).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub details: String,
    pub estimate_range: Option<String>,
    pub photo_files: Vec<PhotoFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteWarning {
    MissingFields,
    MailNotConfigured,
    SendFailed,
}

impl QuoteWarning {
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::MailNotConfigured => "resend_not_configured",
            Self::SendFailed => "email_send_failed",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required quote fields",
            Self::MailNotConfigured => "Email service not configured",
            Self::SendFailed => "Failed to send quote emails",
        }
    }
}

/// What happened when a quote was handed to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDelivery {
    pub owner_message: Option<MessageId>,
    pub customer_message: Option<MessageId>,
    pub warning: Option<QuoteWarning>,
}

impl QuoteDelivery {
    fn warned(warning: QuoteWarning) -> Self {
        Self {
            owner_message: None,
            customer_message: None,
            warning: Some(warning),
        }
    }
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    /// E-mails the quote to the crew, then a confirmation copy to the customer.
    ///
    /// Never fails: every problem is folded into `QuoteDelivery::warning` and
    /// the router decides how loudly to report it.
    pub async fn deliver_quote(&self, request: QuoteRequest) -> QuoteDelivery {
        let (Some(name), Some(email), Some(service), Some(details)) = (
            non_empty(&request.name),
            non_empty(&request.email),
            non_empty(&request.service),
            non_empty(&request.details),
        ) else {
            warn!(
                has_name = !request.name.trim().is_empty(),
                has_email = !request.email.trim().is_empty(),
                "quote payload missing required fields"
            );
            return QuoteDelivery::warned(QuoteWarning::MissingFields);
        };

        let quote = QuoteContent {
            name,
            email,
            phone: non_empty(&request.phone).unwrap_or("N/A"),
            service,
            details,
            estimate_range: request.estimate_range.as_deref().and_then(non_empty),
        };

        let owner_message = EmailMessage::new(
            self.settings.quote.from.clone(),
            self.settings.quote.internal_recipients(),
            format!("New quote request – {service}"),
            EmailBody::Text(owner_text(&quote, &request.photo_files)),
        )
        .with_attachments(photo_attachments(&request.photo_files));

        let customer_message = EmailMessage::new(
            self.settings.quote.from.clone(),
            vec![email.to_string()],
            "We received your quote request",
            EmailBody::Text(self.customer_text(&quote)),
        );

        info!(service, photos = request.photo_files.len(), "sending quote emails");

        let owner_id = match self.mailer.send(owner_message).await {
            Ok(id) => id,
            Err(err) => return Self::failed_delivery(err),
        };
        let customer_id = match self.mailer.send(customer_message).await {
            Ok(id) => id,
            Err(err) => {
                let mut delivery = Self::failed_delivery(err);
                delivery.owner_message = Some(owner_id);
                return delivery;
            }
        };

        QuoteDelivery {
            owner_message: Some(owner_id),
            customer_message: Some(customer_id),
            warning: None,
        }
    }

    fn failed_delivery(err: MailError) -> QuoteDelivery {
        match err {
            MailError::NotConfigured => {
                error!("email provider key is missing; quote was not delivered");
                QuoteDelivery::warned(QuoteWarning::MailNotConfigured)
            }
            other => {
                error!(error = %other, "error sending quote emails");
                QuoteDelivery::warned(QuoteWarning::SendFailed)
            }
        }
    }

    fn customer_text(&self, quote: &QuoteContent<'_>) -> String {
        let business = &self.settings.business;
        let mut lines = vec![
            format!("Hi {},", quote.name),
            String::new(),
            format!("Thanks for reaching out to {}.", business.name),
            String::new(),
            "Here’s a copy of the details you submitted so you can refer back to it:".to_string(),
            String::new(),
            format!("Name: {}", quote.name),
            format!("Email: {}", quote.email),
            format!("Phone: {}", quote.phone),
            format!("Service: {}", quote.service),
        ];
        if let Some(range) = quote.estimate_range {
            lines.push(format!("Estimated range: {range}"));
        }
        lines.extend([
            String::new(),
            "Your responses:".to_string(),
            "----------------".to_string(),
            quote.details.to_string(),
            String::new(),
            "This range is an estimate only. A member of the crew will review it,".to_string(),
            "match it to the right truck and team, and reach out to lock in a firm".to_string(),
            "quote and schedule.".to_string(),
            String::new(),
            "If anything changes, you can reply directly to this email or call:".to_string(),
            business.name.clone(),
            format!("Phone: {}", business.phone),
            format!("Email: {}", business.email),
        ]);
        lines.join("\n")
    }
}

struct QuoteContent<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    service: &'a str,
    details: &'a str,
    estimate_range: Option<&'a str>,
}

fn owner_text(quote: &QuoteContent<'_>, photos: &[PhotoFile]) -> String {
    let mut lines = vec![
        "New quote request from the website quiz".to_string(),
        String::new(),
        format!("Customer: {} <{}>", quote.name, quote.email),
        format!("Phone: {}", quote.phone),
        format!("Service: {}", quote.service),
    ];
    if let Some(range) = quote.estimate_range {
        lines.push(format!("Estimated range: {range}"));
    }
    lines.extend([
        String::new(),
        "Customer responses:".to_string(),
        "-------------------".to_string(),
        quote.details.to_string(),
        String::new(),
        photo_summary(photos),
        String::new(),
        "— Automated lead from the website quiz".to_string(),
    ]);
    lines.join("\n")
}

fn photo_label(photo: &PhotoFile, idx: usize) -> String {
    non_empty(&photo.name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("image-{}", idx + 1))
}

pub(crate) fn photo_summary(photos: &[PhotoFile]) -> String {
    if photos.is_empty() {
        return "Uploaded photos: none attached via quiz.".to_string();
    }
    let mut lines = vec![format!("Uploaded photos ({}):", photos.len())];
    for (idx, photo) in photos.iter().enumerate() {
        let label = photo_label(photo, idx);
        match non_empty(&photo.content_type) {
            Some(content_type) => lines.push(format!("- {label} ({content_type})")),
            None => lines.push(format!("- {label}")),
        }
    }
    lines.join("\n")
}

fn photo_attachments(photos: &[PhotoFile]) -> Vec<EmailAttachment> {
    photos
        .iter()
        .enumerate()
        .filter(|(_, photo)| !photo.raw_base64().is_empty())
        .map(|(idx, photo)| EmailAttachment {
            filename: photo_label(photo, idx),
            content_base64: photo.raw_base64().to_string(),
            content_type: non_empty(&photo.content_type).map(str::to_string),
        })
        .collect()
}
