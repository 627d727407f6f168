//! EmailJS REST client

use super::{EmailProvider, OutboundEmail, ProviderResponse, UpstreamError};
use crate::models::TemplateParams;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: &'a TemplateParams,
}

impl<'a> From<&'a OutboundEmail> for SendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            service_id: &email.service_id,
            template_id: &email.template_id,
            user_id: &email.public_key,
            access_token: &email.private_key,
            template_params: &email.template_params,
        }
    }
}

impl EmailJsClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl EmailProvider for EmailJsClient {
    async fn send(&self, email: &OutboundEmail) -> Result<ProviderResponse, UpstreamError> {
        tracing::debug!(
            service_id = %email.service_id,
            template_id = %email.template_id,
            "calling EmailJS send"
        );

        let response = self
            .http
            .post(&self.api_url)
            .json(&SendRequest::from(email))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_response(response).await);
        }

        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ProviderResponse { status, text })
    }
}
