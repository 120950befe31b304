// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use gem_leads::app::{create_router, AppState, VERSION};
use gem_leads::config::Config;
use gem_leads::services::logging;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    logging::init(&config.log_level).context("invalid log filter")?;

    let scraper = config
        .build_scraper()
        .context("failed to initialise directory scraper")?;

    tracing::info!(
        base_url = %config.base_url,
        output_mode = %config.output_mode,
        downloads_dir = %config.downloads_dir.display(),
        "scraper configured"
    );

    let state = AppState {
        scraper: Arc::new(scraper),
        downloads: config.file_exporter(),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("gem-leads v{} listening on {}", VERSION, config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
