use config::{Config, ConfigError, Environment, File};
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Variables from the original deployment, mapped onto their structured keys.
/// They are applied after every other source.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("GEMINI_API_KEY", "quote.api_key"),
    ("EMAILJS_API_PUBLIC_KEY", "email.public_key"),
    ("EMAILJS_API_PRIVATE_KEY", "email.private_key"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub quote: QuoteConfig,
    pub email: EmailConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub recipient_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Borrowed EmailJS key pair, only available when both halves are set.
#[derive(Debug, Clone, Copy)]
pub struct EmailCredentials<'a> {
    pub public_key: &'a str,
    pub private_key: &'a str,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            quote: QuoteConfig::default(),
            email: EmailConfig::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 100 * 1024,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "https://keiner-alvarado-quintero.top".to_string(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            private_key: None,
            api_url: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: "service_zyto9nc".to_string(),
            template_id: "template_jhxtafk".to_string(),
            recipient_name: "Keiner Alvarado".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
        }
    }
}

impl QuoteConfig {
    /// The Gemini key, treating an empty value the same as an absent one.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }
}

impl EmailConfig {
    pub fn credentials(&self) -> Option<EmailCredentials<'_>> {
        Some(EmailCredentials {
            public_key: non_empty(self.public_key.as_deref())?,
            private_key: non_empty(self.private_key.as_deref())?,
        })
    }
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads configuration from `config.toml` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(Some(Path::new("config.toml")), &env)
    }

    /// Layers defaults, an optional TOML file, `APP_*` variables and the legacy
    /// variable names, in that order of increasing precedence.
    pub fn load_from(
        config_file: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = env.get(*var).map(|v| {
                if *key == "logging.format" {
                    v.to_lowercase()
                } else {
                    v.clone()
                }
            });
            builder = builder.set_override_option(*key, value)?;
        }

        let app_config: AppConfig = builder.build()?.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Message(
                "Max body size must be greater than 0".to_string(),
            ));
        }

        if self.cors.allowed_origin.trim().is_empty() {
            return Err(ConfigError::Message(
                "Allowed origin cannot be empty".to_string(),
            ));
        }

        if HeaderValue::from_str(&self.cors.allowed_origin).is_err() {
            return Err(ConfigError::Message(format!(
                "Allowed origin is not a valid header value: {}",
                self.cors.allowed_origin
            )));
        }

        if self.quote.api_base_url.is_empty() || self.quote.model.is_empty() {
            return Err(ConfigError::Message(
                "Quote API base URL and model cannot be empty".to_string(),
            ));
        }

        if self.email.api_url.is_empty() {
            return Err(ConfigError::Message(
                "Email API URL cannot be empty".to_string(),
            ));
        }

        if self.email.service_id.is_empty() || self.email.template_id.is_empty() {
            return Err(ConfigError::Message(
                "Email service and template identifiers cannot be empty".to_string(),
            ));
        }

        if self.upstream.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Upstream request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Credentials that are absent, as human-readable notices. Missing
    /// credentials are not a load error; the affected route answers 500.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.quote.api_key().is_none() {
            missing.push("GEMINI_API_KEY is not set - /quote will answer with 500");
        }

        if self.email.credentials().is_none() {
            missing.push("EmailJS keys are not set - /send-email will answer with 500");
        }

        missing
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
