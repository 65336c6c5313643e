use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::repository::LeadLog;
use super::service::{escape_html, LeadService};
use crate::integrations::{EmailBody, EmailMessage, Mailer, PaymentGateway};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HiringApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub role: String,
    pub availability: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringReceipt {
    pub ok: bool,
    pub email_sent: bool,
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    /// Forwards a crew application to the hiring inbox. Always acknowledged.
    pub async fn submit_application(&self, application: HiringApplication) -> HiringReceipt {
        let message = EmailMessage::new(
            self.settings.hiring.from.clone(),
            vec![self.settings.hiring.to.clone()],
            "New Neighborhood Krew Application",
            EmailBody::Html(application_html(&application)),
        );

        let email_sent = match self.mailer.send(message).await {
            Ok(_) => {
                info!(role = %application.role, "hiring application forwarded");
                true
            }
            Err(err) => {
                warn!(error = %err, "hiring application email not sent");
                false
            }
        };

        HiringReceipt {
            ok: true,
            email_sent,
        }
    }
}

fn application_html(application: &HiringApplication) -> String {
    let rows = [
        ("Name", &application.name),
        ("Email", &application.email),
        ("Phone", &application.phone),
        ("City", &application.city),
        ("Role", &application.role),
        ("Availability", &application.availability),
    ]
    .iter()
    .map(|(label, value)| format!("<li><b>{label}:</b> {}</li>", escape_html(value)))
    .collect::<Vec<_>>()
    .join("");

    format!(
        "<div style=\"font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif\">\
<h2>New Hiring Application</h2><ul>{rows}</ul>\
<p><b>Notes:</b><br/>{notes}</p></div>",
        notes = escape_html(&application.notes),
    )
}
