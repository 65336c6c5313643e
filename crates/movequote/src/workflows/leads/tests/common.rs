use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::integrations::{
    EmailMessage, MailError, Mailer, MessageId, PaymentError, PaymentGateway, PaymentIntent,
    PaymentIntentRequest,
};
use crate::workflows::leads::{LeadEntry, LeadLog, LeadLogError, LeadService, LeadSettings};

pub(super) fn build_service() -> (
    LeadService<RecordingMailer, FakeGateway, MemoryLeadLog>,
    Arc<RecordingMailer>,
    Arc<FakeGateway>,
    Arc<MemoryLeadLog>,
) {
    build_service_with(LeadSettings::default())
}

pub(super) fn build_service_with(
    settings: LeadSettings,
) -> (
    LeadService<RecordingMailer, FakeGateway, MemoryLeadLog>,
    Arc<RecordingMailer>,
    Arc<FakeGateway>,
    Arc<MemoryLeadLog>,
) {
    let mailer = Arc::new(RecordingMailer::default());
    let gateway = Arc::new(FakeGateway::default());
    let leads = Arc::new(MemoryLeadLog::default());
    let service = LeadService::new(mailer.clone(), gateway.clone(), leads.clone(), settings);
    (service, mailer, gateway, leads)
}

pub(super) fn failing_service(
    failure: MailFailure,
    settings: LeadSettings,
) -> LeadService<FailingMailer, FakeGateway, MemoryLeadLog> {
    LeadService::new(
        Arc::new(FailingMailer { failure }),
        Arc::new(FakeGateway::default()),
        Arc::new(MemoryLeadLog::default()),
        settings,
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<MessageId, MailError> {
        let mut guard = self.sent.lock().expect("mailer mutex poisoned");
        guard.push(message);
        Ok(MessageId(format!("msg-{}", guard.len())))
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum MailFailure {
    NotConfigured,
    Rejected,
}

pub(super) struct FailingMailer {
    failure: MailFailure,
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: EmailMessage) -> Result<MessageId, MailError> {
        Err(match self.failure {
            MailFailure::NotConfigured => MailError::NotConfigured,
            MailFailure::Rejected => MailError::Rejected {
                status: 422,
                body: "invalid from address".to_string(),
            },
        })
    }
}

#[derive(Default)]
pub(super) struct FakeGateway {
    requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl FakeGateway {
    pub(super) fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request);
        Ok(PaymentIntent {
            id: "pi_test_123".to_string(),
            client_secret: "pi_test_123_secret_abc".to_string(),
        })
    }
}

pub(super) struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_payment_intent(
        &self,
        _request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}

pub(super) struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn create_payment_intent(
        &self,
        _request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        Err(PaymentError::Rejected {
            status: 402,
            body: "card_declined".to_string(),
        })
    }
}

#[derive(Default)]
pub(super) struct MemoryLeadLog {
    entries: Mutex<Vec<LeadEntry>>,
}

impl LeadLog for MemoryLeadLog {
    fn push(&self, entry: LeadEntry) -> Result<(), LeadLogError> {
        self.entries
            .lock()
            .expect("lead log mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadEntry>, LeadLogError> {
        let guard = self.entries.lock().expect("lead log mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct OfflineLeadLog;

impl LeadLog for OfflineLeadLog {
    fn push(&self, _entry: LeadEntry) -> Result<(), LeadLogError> {
        Err(LeadLogError::Unavailable("disk full".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<LeadEntry>, LeadLogError> {
        Err(LeadLogError::Unavailable("disk full".to_string()))
    }
}
