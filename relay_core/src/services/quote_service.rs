//! Quote relay: prompt construction, one model call, parse-or-fallback

use crate::{
    clients::TextGenerator,
    config::QuoteConfig,
    error::{AppError, Result},
    models::{Quote, QuoteOutcome},
};
use std::sync::Arc;
use tracing::{debug, warn};

pub const MISSING_API_KEY_MESSAGE: &str = "API Key missing";
pub const QUOTE_FAILURE_MESSAGE: &str = "Failed to fetch quote";

#[derive(Clone)]
pub struct QuoteService {
    config: QuoteConfig,
    generator: Arc<dyn TextGenerator>,
}

impl QuoteService {
    pub fn new(config: QuoteConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// Asks the model for one quote in `lang`. Unparseable answers become the
    /// fallback quote; only a missing key or a failed call is an error.
    pub async fn get_quote(&self, lang: &str) -> Result<QuoteOutcome> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| AppError::Configuration(MISSING_API_KEY_MESSAGE.to_string()))?;

        let prompt = build_prompt(lang);
        debug!(lang = %lang, "requesting quote");

        let raw = self
            .generator
            .generate(api_key, &prompt)
            .await
            .map_err(|source| AppError::upstream(QUOTE_FAILURE_MESSAGE, source))?;

        let outcome = parse_quote(&raw, lang);
        if let QuoteOutcome::Fallback { reason, .. } = &outcome {
            warn!(lang = %lang, reason = %reason, raw = %raw, "Error parsing quote, serving fallback");
        }

        Ok(outcome)
    }
}

/// Prompt sent to the model. "Not sent recently" is only a hint; nothing is remembered.
pub fn build_prompt(lang: &str) -> String {
    format!(
        r#"Dame otra frase inspiradora (que no hayas enviado hace poco) en {lang}, con su autor. Responde solo con el formato JSON:
{{
  "text": "Aquí la frase",
  "author": "Aquí el autor"
}}"#
    )
}

/// Removes every ```json and ``` marker, wherever it appears, and trims the rest.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Only a JSON object with string `text` and `author` counts as a quote.
pub fn parse_quote(raw: &str, lang: &str) -> QuoteOutcome {
    let cleaned = strip_code_fences(raw);
    match quote_from_text(&cleaned) {
        Ok(quote) => QuoteOutcome::Parsed(quote),
        Err(reason) => QuoteOutcome::Fallback {
            quote: Quote::fallback(lang),
            reason,
        },
    }
}

fn quote_from_text(text: &str) -> std::result::Result<Quote, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err(format!("expected a JSON object, got {}", value));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
