//! Server-side lead handlers: quote e-mails, promo signups, deposit checkout,
//! checklist capture, and crew hiring applications.

pub mod checklist;
pub mod deposit;
pub mod hiring;
pub mod promo;
pub mod quote;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use checklist::{ChecklistError, ChecklistLeadRequest, ChecklistRequest};
pub use deposit::{DepositError, DepositRequest, DepositSession};
pub use hiring::{HiringApplication, HiringReceipt};
pub use promo::{generate_promo_code, is_valid_email, PromoError, PromoReceipt, PromoRequest};
pub use quote::{QuoteDelivery, QuoteRequest, QuoteWarning};
pub use repository::{ClientContext, LeadEntry, LeadLog, LeadLogError};
pub use router::lead_router;
pub use service::LeadService;
pub use settings::{
    BusinessContact, ChecklistSettings, DeliveryFailurePolicy, DepositSettings, HiringSettings,
    LeadSettings, PromoCodeSource, PromoSettings, QuoteMailSettings,
};
