use metrics_exporter_prometheus::PrometheusHandle;
use movequote::config::AppConfig;
use movequote::integrations::{ResendMailer, StripeGateway};
use movequote::workflows::leads::{LeadEntry, LeadLog, LeadLogError, LeadService};
use movequote::workflows::quote::{DistanceBand, EstimatePolicy, HomeSize, JobType, JunkWeight};
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

const LEAD_LOG_CAPACITY: usize = 1_000;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) estimate_policy: EstimatePolicy,
}

pub(crate) type LiveLeadService = LeadService<ResendMailer, StripeGateway, InMemoryLeadLog>;

/// Process-local lead list; the oldest entries fall off once full.
#[derive(Clone)]
pub(crate) struct InMemoryLeadLog {
    entries: Arc<Mutex<VecDeque<LeadEntry>>>,
    capacity: usize,
}

impl Default for InMemoryLeadLog {
    fn default() -> Self {
        Self::with_capacity(LEAD_LOG_CAPACITY)
    }
}

impl InMemoryLeadLog {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }
}

impl LeadLog for InMemoryLeadLog {
    fn push(&self, entry: LeadEntry) -> Result<(), LeadLogError> {
        let mut guard = self.entries.lock().expect("lead log mutex poisoned");
        if guard.len() == self.capacity {
            guard.pop_front();
        }
        guard.push_back(entry);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadEntry>, LeadLogError> {
        let guard = self.entries.lock().expect("lead log mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(crate) fn build_lead_service(config: &AppConfig) -> LiveLeadService {
    LeadService::new(
        Arc::new(ResendMailer::new(config.providers.resend_api_key.clone())),
        Arc::new(StripeGateway::new(
            config.providers.stripe_secret_key.clone(),
        )),
        Arc::new(InMemoryLeadLog::default()),
        config.leads.clone(),
    )
}

pub(crate) fn parse_job_type(raw: &str) -> Result<JobType, String> {
    JobType::parse(raw)
        .ok_or_else(|| format!("unknown job type '{raw}' (residential, commercial, junk)"))
}

pub(crate) fn parse_home_size(raw: &str) -> Result<HomeSize, String> {
    HomeSize::parse(raw)
        .ok_or_else(|| format!("unknown home size '{raw}' (studio_1br, 2br, 3br, 4br, 5plus)"))
}

pub(crate) fn parse_distance(raw: &str) -> Result<DistanceBand, String> {
    DistanceBand::parse(raw)
        .ok_or_else(|| format!("unknown distance '{raw}' (under25, 25-75, 75-150, 150plus)"))
}

pub(crate) fn parse_junk_weight(raw: &str) -> Result<JunkWeight, String> {
    JunkWeight::parse(raw).ok_or_else(|| {
        format!("unknown junk weight '{raw}' (under500, 500-1500, 1500-3000, 3000plus)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;

    fn entry(source: &str) -> LeadEntry {
        LeadEntry {
            email: None,
            source: source.to_string(),
            utm: Value::Null,
            timestamp: Utc::now(),
            ip: None,
            user_agent: None,
        }
    }

    #[test]
    fn lead_log_drops_oldest_when_full() {
        let log = InMemoryLeadLog::with_capacity(2);
        log.push(entry("a")).expect("push");
        log.push(entry("b")).expect("push");
        log.push(entry("c")).expect("push");

        let recent = log.recent(10).expect("recent");
        let sources: Vec<&str> = recent.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["c", "b"]);
    }

    #[test]
    fn value_parsers_accept_wire_names() {
        assert_eq!(parse_job_type("junk"), Ok(JobType::Junk));
        assert_eq!(parse_home_size("2br"), Ok(HomeSize::TwoBedroom));
        assert_eq!(parse_distance("150plus"), Ok(DistanceBand::Over150));
        assert!(parse_junk_weight("heavy").is_err());
    }
}
