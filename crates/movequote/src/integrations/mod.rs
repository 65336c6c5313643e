//! Adapters for the third-party services the lead handlers depend on.

pub mod mail;
pub mod payments;

pub use mail::{
    EmailAttachment, EmailBody, EmailMessage, MailError, Mailer, MessageId, ResendMailer,
};
pub use payments::{
    PaymentError, PaymentGateway, PaymentIntent, PaymentIntentRequest, StripeGateway,
};
