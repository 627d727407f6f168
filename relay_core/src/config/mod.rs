//! Application configuration

pub mod settings;

pub use settings::{
    AppConfig, CorsConfig, EmailConfig, EmailCredentials, LogFormat, LoggingConfig, QuoteConfig,
    ServerConfig, UpstreamConfig,
};
