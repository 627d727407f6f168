//! Quote request and response models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_LANG: &str = "es";

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    #[serde(default = "default_lang", deserialize_with = "lang_or_default")]
    pub lang: String,
}

impl Default for QuoteRequest {
    fn default() -> Self {
        Self {
            lang: default_lang(),
        }
    }
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// `null` means "not given"; any other non-string value is used in its JSON form.
fn lang_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => default_lang(),
        Some(Value::String(lang)) => lang,
        Some(other) => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// The static quote served when the model's answer cannot be parsed.
    /// Only `"es"` gets the Spanish quote; every other language gets the English one.
    pub fn fallback(lang: &str) -> Self {
        if lang == "es" {
            Self::new(
                "El éxito es la suma de pequeños esfuerzos repetidos día tras día.",
                "Robert Collier",
            )
        } else {
            Self::new(
                "The only way to do great work is to love what you do.",
                "Steve Jobs",
            )
        }
    }
}

/// Result of interpreting the model's text as a quote.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Parsed(Quote),
    Fallback { quote: Quote, reason: String },
}

impl QuoteOutcome {
    pub fn quote(&self) -> &Quote {
        match self {
            QuoteOutcome::Parsed(quote) => quote,
            QuoteOutcome::Fallback { quote, .. } => quote,
        }
    }

    pub fn into_quote(self) -> Quote {
        match self {
            QuoteOutcome::Parsed(quote) => quote,
            QuoteOutcome::Fallback { quote, .. } => quote,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, QuoteOutcome::Fallback { .. })
    }
}
