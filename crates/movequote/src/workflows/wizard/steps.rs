use serde::Serialize;

use crate::workflows::quote::JobType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    JobType,
    HomeAndDistance,
    ScopeAndDistance,
    JunkDetails,
    Logistics,
    Contact,
}

impl WizardStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::JobType => "Job Type",
            Self::HomeAndDistance => "Home & Distance",
            Self::ScopeAndDistance => "Scope & Distance",
            Self::JunkDetails => "Junk Details",
            Self::Logistics => "Logistics",
            Self::Contact => "Contact",
        }
    }
}

const RESIDENTIAL_STEPS: [WizardStep; 4] = [
    WizardStep::JobType,
    WizardStep::HomeAndDistance,
    WizardStep::Logistics,
    WizardStep::Contact,
];

const COMMERCIAL_STEPS: [WizardStep; 4] = [
    WizardStep::JobType,
    WizardStep::ScopeAndDistance,
    WizardStep::Logistics,
    WizardStep::Contact,
];

const JUNK_STEPS: [WizardStep; 3] = [
    WizardStep::JobType,
    WizardStep::JunkDetails,
    WizardStep::Contact,
];

/// Ordered steps shown for a job type.
pub const fn sequence_for(job_type: JobType) -> &'static [WizardStep] {
    match job_type {
        JobType::Residential => &RESIDENTIAL_STEPS,
        JobType::Commercial => &COMMERCIAL_STEPS,
        JobType::Junk => &JUNK_STEPS,
    }
}
