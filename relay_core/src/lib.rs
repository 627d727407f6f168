//! Core library for the quote and contact-email relay: configuration, upstream
//! clients, relay services and the HTTP surface that exposes them.

pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use clients::{EmailJsClient, EmailProvider, GeminiClient, TextGenerator, UpstreamError};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use middleware::cors::{cors_layer, origin_allowed, origin_gate};
pub use middleware::logging::logging_layer;
pub use models::{ContactMessage, EmailDispatchResult, Quote, QuoteOutcome, QuoteRequest};
pub use services::{EmailService, QuoteService};

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub config: Arc<AppConfig>,
    pub quote_service: QuoteService,
    pub email_service: EmailService,
}

impl AppState {
    /// Builds the state with the real Gemini and EmailJS clients sharing one HTTP pool.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream.request_timeout())
            .build()
            .map_err(|e| AppError::Other(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        let generator = Arc::new(GeminiClient::new(
            http.clone(),
            config.quote.api_base_url.clone(),
            config.quote.model.clone(),
        ));
        let provider = Arc::new(EmailJsClient::new(http, config.email.api_url.clone()));

        Ok(Self::with_clients(config, generator, provider))
    }

    pub fn with_clients(
        config: AppConfig,
        generator: Arc<dyn TextGenerator>,
        provider: Arc<dyn EmailProvider>,
    ) -> Self {
        Self {
            app_name: "Quote & Contact Relay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            quote_service: QuoteService::new(config.quote.clone(), generator),
            email_service: EmailService::new(config.email.clone(), provider),
            config: Arc::new(config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    let allowed_origin: Arc<str> = Arc::from(config.cors.allowed_origin.as_str());

    Router::new()
        .merge(create_routes())
        .fallback(handlers::routes::handle_not_found)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(middleware::cors::cors_layer(&config.cors))
        .layer(axum_middleware::from_fn_with_state(
            allowed_origin,
            middleware::cors::origin_gate,
        ))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Other(anyhow::anyhow!("Failed to bind {}: {}", addr, e)))?;

    info!("Servidor corriendo en el puerto {}", addr.port());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Other(anyhow::anyhow!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
