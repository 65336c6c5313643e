use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::repository::{ClientContext, LeadLog};
use super::service::{escape_html, LeadService};
use super::settings::PromoCodeSource;
use crate::integrations::{EmailBody, EmailMessage, Mailer, PaymentGateway};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromoRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoReceipt {
    pub ok: bool,
    pub code: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromoError {
    #[error("Valid email is required")]
    InvalidEmail,
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email)
}

/// Random code like `NK-7QXM-3HPA` from an alphabet without look-alike characters.
pub fn generate_promo_code(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut segment = || -> String {
        (0..4)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect()
    };
    let first = segment();
    let second = segment();
    format!("{prefix}-{first}-{second}")
}

impl PromoCodeSource {
    pub fn issue(&self) -> String {
        match self {
            Self::Fixed(code) => code.clone(),
            Self::Generated { prefix } => generate_promo_code(prefix),
        }
    }
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    /// Records a promo signup and e-mails the discount code.
    ///
    /// The code is returned even when the e-mail could not be sent so the page
    /// can show it as a backup.
    pub async fn subscribe(
        &self,
        request: PromoRequest,
        client: &ClientContext,
    ) -> Result<PromoReceipt, PromoError> {
        let email = request.email.trim();
        if !is_valid_email(email) {
            return Err(PromoError::InvalidEmail);
        }

        let settings = &self.settings.promo;
        let code = settings.code.issue();
        self.log_lead(Some(email.to_string()), "promo", Value::Null, client);

        let cc: Vec<String> = std::iter::once(settings.owner.clone())
            .chain(settings.manager.clone())
            .collect();
        let message = EmailMessage::new(
            settings.from.clone(),
            vec![email.to_string()],
            settings.subject.clone(),
            EmailBody::Html(self.promo_html(&code)),
        )
        .with_cc(cc);

        match self.mailer.send(message).await {
            Ok(id) => {
                info!(email, "promo code sent");
                Ok(PromoReceipt {
                    ok: true,
                    code,
                    email_sent: true,
                    id: Some(id.0).filter(|id| !id.is_empty()),
                })
            }
            Err(err) => {
                warn!(error = %err, email, "promo email not sent; returning code to the page");
                Ok(PromoReceipt {
                    ok: true,
                    code,
                    email_sent: false,
                    id: None,
                })
            }
        }
    }

    fn promo_html(&self, code: &str) -> String {
        let business = &self.settings.business;
        format!(
            "<div style=\"font-family:ui-sans-serif,system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial; line-height:1.5; color:#111;\">\
<h2 style=\"margin:0 0 12px;\">Here’s your $25 off code</h2>\
<p style=\"margin:0 0 14px;\">Thanks for reaching out to {name}. Use the code below for <strong>$25 off</strong> your next move.</p>\
<div style=\"display:inline-block; padding:14px 18px; border-radius:14px; background:#b6e300; font-weight:800; letter-spacing:1px; font-size:18px;\">{code}</div>\
<p style=\"margin:14px 0 0; color:#444;\">Reply to this email if you have questions or want to lock in a date.</p>\
<p style=\"margin:10px 0 0; color:#666; font-size:12px;\">{name} · {email}</p>\
</div>",
            name = escape_html(&business.name),
            code = escape_html(code),
            email = escape_html(&business.email),
        )
    }
}
