// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walletiq_server::{
    api::{contracts, router},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    // Configuration is read before logging so the output format can follow it.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Server failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_address()?;
    let registry = contracts()?;
    tracing::info!(
        profile = ?config.profile,
        contracts = registry.len(),
        contract_lookup = config.contract_lookup_enabled,
        "Starting {} {}",
        config.app.name,
        config.app.version
    );

    let app = router(AppState::new(config, registry));

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if shutdown_signal().await {
            tracing::info!("Shutdown signal received, draining connections");
            shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    tracing::info!("Listening on http://{addr} (docs at /docs)");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves to `true` on Ctrl+C, `false` if the handler cannot be installed.
async fn shutdown_signal() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            false
        }
    }
}
