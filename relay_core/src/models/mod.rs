pub mod contact;
pub mod quote;

pub use contact::{ContactMessage, EmailDispatchResult, TemplateParams};
pub use quote::{Quote, QuoteOutcome, QuoteRequest};
