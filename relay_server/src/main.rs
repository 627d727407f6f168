//! Main entry point for the relay server binary

use anyhow::Result;
use relay_core::{
    config::{LogFormat, LoggingConfig},
    create_app, run_server, AppConfig, AppState,
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_tracing(&config.logging);

    info!("Configuration loaded successfully");
    for notice in config.missing_credentials() {
        warn!("{}", notice);
    }
    info!("Server will bind to: {}", config.bind_address());
    info!("Allowed origin: {}", config.cors.allowed_origin);
    info!("Quote model: {}", config.quote.model);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let state = AppState::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize relay: {}", e))?;

    info!("App: {} v{}", state.app_name, state.version);

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) {
            "debug"
        } else {
            "info"
        };

        format!(
            "{}={level},relay_core={level},tower_http=info",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            level = default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init(),
    }
}
