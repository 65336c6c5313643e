use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One captured lead (checklist request, promo signup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEntry {
    pub email: Option<String>,
    pub source: String,
    #[serde(default)]
    pub utm: Value,
    pub timestamp: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Request metadata recorded alongside a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Append-only lead list so handlers can be exercised without a real store.
pub trait LeadLog: Send + Sync {
    fn push(&self, entry: LeadEntry) -> Result<(), LeadLogError>;
    fn recent(&self, limit: usize) -> Result<Vec<LeadEntry>, LeadLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LeadLogError {
    #[error("lead log unavailable: {0}")]
    Unavailable(String),
}
