//! Multi-step quote wizard: step sequencing per job type and the submit exit
//! action that hands the finished quote to the crew.

mod controller;
mod steps;
mod submitter;
mod summary;

pub use controller::{DeliveryStatus, SubmissionReceipt, WizardController, WizardError};
pub use steps::{sequence_for, WizardStep};
pub use submitter::{DeliveryError, HttpQuoteSubmitter, PhotoFile, QuotePayload, QuoteSubmitter};
pub use summary::details_summary;
