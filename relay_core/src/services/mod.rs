pub mod email_service;
pub mod quote_service;

pub use email_service::EmailService;
pub use quote_service::QuoteService;
