use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use super::repository::{ClientContext, LeadEntry, LeadLog};
use super::settings::LeadSettings;
use crate::integrations::{Mailer, PaymentGateway};

/// Service composing the mail provider, payment provider, and lead log behind
/// every lead handler.
pub struct LeadService<M, P, L> {
    pub(crate) mailer: Arc<M>,
    pub(crate) payments: Arc<P>,
    pub(crate) leads: Arc<L>,
    pub(crate) settings: LeadSettings,
}

impl<M, P, L> LeadService<M, P, L>
where
    M: Mailer + 'static,
    P: PaymentGateway + 'static,
    L: LeadLog + 'static,
{
    pub fn new(mailer: Arc<M>, payments: Arc<P>, leads: Arc<L>, settings: LeadSettings) -> Self {
        Self {
            mailer,
            payments,
            leads,
            settings,
        }
    }

    pub fn settings(&self) -> &LeadSettings {
        &self.settings
    }

    /// Appends to the lead log; a failing log never blocks the visitor.
    pub(crate) fn log_lead(
        &self,
        email: Option<String>,
        source: &str,
        utm: Value,
        client: &ClientContext,
    ) -> LeadEntry {
        let entry = LeadEntry {
            email,
            source: source.to_string(),
            utm,
            timestamp: Utc::now(),
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };
        if let Err(err) = self.leads.push(entry.clone()) {
            warn!(error = %err, source, "failed to record lead");
        }
        entry
    }
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
