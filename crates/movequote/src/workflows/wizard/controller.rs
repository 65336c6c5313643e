use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::steps::{sequence_for, WizardStep};
use super::submitter::{PhotoFile, QuotePayload, QuoteSubmitter};
use super::summary::details_summary;
use crate::workflows::quote::{
    EstimatePolicy, EstimateResult, IntakeRecord, JobType, PhotoAttachment,
};

pub(crate) const CONTACT_REQUIRED_MESSAGE: &str =
    "Please enter your name and email so we can follow up.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{message}")]
    Validation { message: String },
    #[error("job type can only be chosen on the first step")]
    JobTypeLocked,
}

/// What happened to the background delivery of a submitted quote.
///
/// Never surfaced to the visitor; the estimate is shown either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Uncertain,
}

/// Result of a successful submit: the estimate to show plus a handle on the
/// in-flight delivery.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub estimate: EstimateResult,
    pub details: String,
    pub delivery: JoinHandle<DeliveryStatus>,
}

/// Step-sequencing state machine for the quote wizard.
#[derive(Debug, Clone)]
pub struct WizardController {
    step_index: usize,
    job_type: JobType,
    record: IntakeRecord,
    policy: EstimatePolicy,
    estimate: Option<EstimateResult>,
    submitted: bool,
    error: Option<String>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self::with_policy(EstimatePolicy::default())
    }

    pub fn with_policy(policy: EstimatePolicy) -> Self {
        Self {
            step_index: 0,
            job_type: JobType::default(),
            record: IntakeRecord::default(),
            policy,
            estimate: None,
            submitted: false,
            error: None,
        }
    }

    /// Sequence for the job type chosen on the first step. Edits made to the
    /// record's `job_type` through [`record_mut`](Self::record_mut) are ignored.
    pub fn steps(&self) -> &'static [WizardStep] {
        sequence_for(self.job_type)
    }

    pub fn job_type(&self) -> JobType {
        self.job_type
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> WizardStep {
        let steps = self.steps();
        steps
            .get(self.step_index)
            .or_else(|| steps.last())
            .copied()
            .unwrap_or(WizardStep::JobType)
    }

    pub fn total_steps(&self) -> usize {
        self.steps().len()
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.total_steps()
    }

    pub fn progress_percent(&self) -> u8 {
        let total = self.total_steps().max(1);
        let percent = (self.step_index + 1).min(total) * 100 / total;
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut IntakeRecord {
        &mut self.record
    }

    pub fn estimate(&self) -> Option<EstimateResult> {
        self.estimate
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_photos(&mut self, photos: Vec<PhotoAttachment>) {
        self.record.photos = photos;
    }

    /// Switches the active step sequence. Only the first step offers the choice.
    pub fn select_job_type(&mut self, job_type: JobType) -> Result<(), WizardError> {
        if self.step_index != 0 {
            return Err(WizardError::JobTypeLocked);
        }
        self.job_type = job_type;
        self.record.job_type = job_type;
        Ok(())
    }

    /// Advances one step when the current step's answers are acceptable.
    /// Staying on the last step is not an error.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        if self.is_last_step() {
            return Ok(self.current_step());
        }
        if let Err(err) = validate_step(self.current_step(), &self.record) {
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.step_index += 1;
        self.error = None;
        Ok(self.current_step())
    }

    pub fn prev(&mut self) -> WizardStep {
        if self.step_index > 0 {
            self.step_index -= 1;
        }
        self.error = None;
        self.current_step()
    }

    pub fn reset(&mut self) {
        *self = Self::with_policy(self.policy);
    }

    /// Finishes the wizard: validates contact details, computes the estimate,
    /// and hands the quote to `submitter` without waiting on it.
    ///
    /// Once validation passes the wizard is marked submitted regardless of
    /// what the delivery does; failures only reach the log.
    pub async fn submit<S>(&mut self, submitter: Arc<S>) -> Result<SubmissionReceipt, WizardError>
    where
        S: QuoteSubmitter + ?Sized + 'static,
    {
        self.error = None;
        self.submitted = false;
        self.estimate = None;
        self.record.job_type = self.job_type;

        if let Err(err) = validate_step(WizardStep::Contact, &self.record) {
            self.error = Some(err.to_string());
            return Err(err);
        }

        let estimate = self.policy.estimate(&self.record);
        self.estimate = Some(estimate);
        let details = details_summary(&self.record, &estimate);
        let photo_files = encode_photos(self.record.photos.clone()).await;

        let payload = QuotePayload {
            kind: "quote".to_string(),
            name: self.record.name.trim().to_string(),
            email: self.record.email.trim().to_string(),
            phone: self.record.phone.trim().to_string(),
            service: format!("{} – Quiz Funnel", self.job_type.label()),
            details: details.clone(),
            estimate_range: Some(estimate.display_range()),
            photo_files,
        };

        info!(
            job_type = self.job_type.as_str(),
            low = estimate.low,
            high = estimate.high,
            "quote wizard submitted"
        );

        let delivery = tokio::spawn(async move {
            match submitter.submit(payload).await {
                Ok(()) => DeliveryStatus::Delivered,
                Err(err) => {
                    warn!(error = %err, "quote delivery failed; estimate was still shown");
                    DeliveryStatus::Uncertain
                }
            }
        });

        self.submitted = true;
        Ok(SubmissionReceipt {
            estimate,
            details,
            delivery,
        })
    }
}

fn validate_step(step: WizardStep, record: &IntakeRecord) -> Result<(), WizardError> {
    match step {
        WizardStep::Contact if !record.has_contact_details() => Err(WizardError::Validation {
            message: CONTACT_REQUIRED_MESSAGE.to_string(),
        }),
        _ => Ok(()),
    }
}

async fn encode_photos(photos: Vec<PhotoAttachment>) -> Vec<PhotoFile> {
    if photos.is_empty() {
        return Vec::new();
    }
    let encoded = tokio::task::spawn_blocking(move || {
        photos.iter().map(PhotoFile::encode).collect::<Vec<_>>()
    })
    .await;
    match encoded {
        Ok(files) => files,
        Err(err) => {
            warn!(error = %err, "photo encoding failed; sending quote without photos");
            Vec::new()
        }
    }
}
