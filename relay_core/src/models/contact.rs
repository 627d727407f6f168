//! Contact form models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const EMAIL_SENT_MESSAGE: &str = "¡Correo enviado exitosamente!";

/// Contact form payload. Fields are forwarded as received: any JSON value,
/// `null` included, passes through, and absent fields stay absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` so it is not confused with a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Parameters rendered by the EmailJS template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<Value>,
    pub to_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl TemplateParams {
    pub fn from_contact(contact: ContactMessage, recipient_name: &str) -> Self {
        Self {
            from_name: contact.name,
            to_name: recipient_name.to_string(),
            reply_to: contact.email,
            message: contact.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDispatchResult {
    pub success: bool,
    pub message: String,
}

impl EmailDispatchResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: EMAIL_SENT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_mapping() {
        let contact: ContactMessage = serde_json::from_value(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Hola"
        }))
        .unwrap();

        let params = TemplateParams::from_contact(contact, "Keiner Alvarado");

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "from_name": "Ana",
                "to_name": "Keiner Alvarado",
                "reply_to": "ana@example.com",
                "message": "Hola"
            })
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let contact: ContactMessage = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        let params = TemplateParams::from_contact(contact, "Keiner Alvarado");

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "from_name": "", "to_name": "Keiner Alvarado" })
        );
    }

    #[test]
    fn test_null_and_non_string_fields_pass_through() {
        let contact: ContactMessage =
            serde_json::from_str(r#"{"name": 42, "email": null, "message": ["a", "b"]}"#).unwrap();
        let params = TemplateParams::from_contact(contact, "Keiner Alvarado");

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "from_name": 42,
                "to_name": "Keiner Alvarado",
                "reply_to": null,
                "message": ["a", "b"]
            })
        );
    }

    #[test]
    fn test_dispatch_result_body() {
        assert_eq!(
            serde_json::to_value(EmailDispatchResult::sent()).unwrap(),
            json!({ "success": true, "message": "¡Correo enviado exitosamente!" })
        );
    }
}
