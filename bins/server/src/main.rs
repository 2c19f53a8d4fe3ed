//! Caixa API Server
//!
//! Main entry point for the cash and cash-equivalent reporting backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caixa_api::{AppState, create_router};
use caixa_core::cash::{CashService, ReportDefaults};
use caixa_db::{CashRepository, SqlTemplateStore, connect};
use caixa_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caixa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // SQL templates, with the cash account range bound into every query
    let templates = SqlTemplateStore::new(&config.reports.sql_dir)
        .with_fixed_parameters(config.reports.fixed_parameters());
    info!(sql_dir = %templates.dir().display(), "SQL templates configured");

    let repository = CashRepository::new(db, Arc::new(templates));
    if let Err(e) = repository.check_templates().await {
        warn!(error = %e, "SQL template check failed; affected reports will answer with sucesso=false");
    }

    // Create application state
    let service = CashService::new(
        Arc::new(repository),
        ReportDefaults::from(&config.reports),
    );
    let state = AppState::new(service);

    // Create router
    let app = create_router(state, config.server.static_dir.as_deref());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
