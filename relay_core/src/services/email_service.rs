//! Contact-form relay to the transactional email provider

use crate::{
    clients::{EmailProvider, OutboundEmail},
    config::EmailConfig,
    error::{AppError, Result},
    models::{ContactMessage, EmailDispatchResult, TemplateParams},
};
use std::sync::Arc;
use tracing::info;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Faltan las claves de EmailJS";
pub const EMAIL_FAILURE_MESSAGE: &str = "No se pudo enviar el correo";

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    provider: Arc<dyn EmailProvider>,
}

impl EmailService {
    pub fn new(config: EmailConfig, provider: Arc<dyn EmailProvider>) -> Self {
        Self { config, provider }
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    pub async fn send_contact_email(&self, contact: ContactMessage) -> Result<EmailDispatchResult> {
        let credentials = self
            .config
            .credentials()
            .ok_or_else(|| AppError::Configuration(MISSING_CREDENTIALS_MESSAGE.to_string()))?;

        let email = OutboundEmail {
            service_id: self.config.service_id.clone(),
            template_id: self.config.template_id.clone(),
            public_key: credentials.public_key.to_string(),
            private_key: credentials.private_key.to_string(),
            template_params: TemplateParams::from_contact(contact, &self.config.recipient_name),
        };

        let response = self
            .provider
            .send(&email)
            .await
            .map_err(|source| AppError::upstream(EMAIL_FAILURE_MESSAGE, source))?;

        info!(status = response.status, body = %response.text, "EmailJS accepted the message");

        Ok(EmailDispatchResult::sent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ProviderResponse, UpstreamError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        fail: bool,
        sent: Mutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl EmailProvider for RecordingProvider {
        async fn send(&self, email: &OutboundEmail) -> std::result::Result<ProviderResponse, UpstreamError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(UpstreamError::Decode("template not found".to_string()));
            }
            Ok(ProviderResponse {
                status: 200,
                text: "OK".to_string(),
            })
        }
    }

    fn configured() -> EmailConfig {
        EmailConfig {
            public_key: Some("public".to_string()),
            private_key: Some("private".to_string()),
            ..EmailConfig::default()
        }
    }

    fn contact() -> ContactMessage {
        ContactMessage {
            name: Some(json!("Ana")),
            email: Some(json!("ana@example.com")),
            message: Some(json!("Hola")),
        }
    }

    #[tokio::test]
    async fn test_sends_with_configured_identifiers() {
        let provider = Arc::new(RecordingProvider::default());
        let service = EmailService::new(configured(), provider.clone());

        let result = service.send_contact_email(contact()).await.unwrap();
        assert_eq!(result, EmailDispatchResult::sent());

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].service_id, "service_zyto9nc");
        assert_eq!(sent[0].template_id, "template_jhxtafk");
        assert_eq!(sent[0].public_key, "public");
        assert_eq!(sent[0].private_key, "private");
        assert_eq!(sent[0].template_params.from_name, Some(json!("Ana")));
        assert_eq!(sent[0].template_params.to_name, "Keiner Alvarado");
        assert_eq!(sent[0].template_params.reply_to, Some(json!("ana@example.com")));
    }

    #[tokio::test]
    async fn test_missing_either_key_skips_provider() {
        for (public_key, private_key) in [
            (None, Some("private")),
            (Some("public"), None),
            (Some(""), Some("private")),
        ] {
            let provider = Arc::new(RecordingProvider::default());
            let config = EmailConfig {
                public_key: public_key.map(String::from),
                private_key: private_key.map(String::from),
                ..EmailConfig::default()
            };
            let service = EmailService::new(config, provider.clone());

            let result = service.send_contact_email(contact()).await;

            assert!(
                matches!(result, Err(AppError::Configuration(ref msg)) if msg == "Faltan las claves de EmailJS")
            );
            assert!(provider.sent.lock().unwrap().is_empty());
            assert!(!service.is_configured());
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic() {
        let provider = Arc::new(RecordingProvider {
            fail: true,
            ..RecordingProvider::default()
        });
        let service = EmailService::new(configured(), provider);

        match service.send_contact_email(contact()).await {
            Err(AppError::Upstream { public, .. }) => assert_eq!(public, "No se pudo enviar el correo"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
