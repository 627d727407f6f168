//! Outbound clients for the third-party services the relay forwards to

pub mod emailjs;
pub mod gemini;

pub use emailjs::EmailJsClient;
pub use gemini::GeminiClient;

use crate::models::TemplateParams;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Longest slice of an upstream error body kept for logging.
const MAX_ERROR_BODY: usize = 500;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Builds a `Status` error from a non-success response, keeping a bounded body excerpt.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body = match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((idx, _)) => body[..idx].to_string(),
            None => body,
        };
        UpstreamError::Status { status, body }
    }
}

/// A generative-text backend that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the text of the first candidate, or an empty string when there is none.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, UpstreamError>;
}

/// Everything the email provider needs for one send.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub private_key: String,
    pub template_params: TemplateParams,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub text: String,
}

/// A transactional-email backend.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<ProviderResponse, UpstreamError>;
}
