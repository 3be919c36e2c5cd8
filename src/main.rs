//! BSB Lookup
//!
//! Keeps an in-memory copy of the published Bank-State-Branch directory,
//! refreshed from the directory's FTP server on a fixed cadence, and serves
//! point lookups over HTTP with Actix-Web.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use tracing::{info, error};
use tracing_actix_web::TracingLogger;
use std::path::Path;
use std::sync::Arc;

mod api;
mod config;
mod domain;
mod remote;
mod snapshot;
mod storage;
mod sync;

use crate::config::Settings;
use crate::domain::ProviderTable;
use crate::remote::FtpSource;
use crate::snapshot::SnapshotStore;
use crate::storage::LocalStore;
use crate::sync::{spawn_sync_loop, SyncOrchestrator};

/// Application state shared across all handlers
pub struct AppState {
    pub snapshots: Arc<SnapshotStore>,
    pub sync: Arc<SyncOrchestrator>,
}

/// Read the institution table once. A missing or malformed file is logged
/// and leaves the table empty, which keeps /health at 503.
async fn load_provider_table(path: &Path) -> ProviderTable {
    info!(path = %path.display(), "Reading saved providers data file");

    let loaded = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|raw| {
            ProviderTable::load(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))
        });

    match loaded {
        Ok(table) => {
            info!(providers = table.len(), "Read and parsed stored providers data");
            table
        }
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "Providers unavailable; starting with an empty table");
            ProviderTable::default()
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bsb_lookup=info".parse()?)
                .add_directive("actix_web=info".parse()?)
        )
        .json()
        .init();

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = settings.bind_addr();

    info!(
        "Starting BSB lookup service v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    let store = LocalStore::open(&settings.storage.path)
        .await
        .context("Failed to open storage directory")?;

    let providers = load_provider_table(&settings.providers_path()).await;
    let snapshots = Arc::new(SnapshotStore::new(providers));

    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::new(FtpSource::new(&settings.ftp)),
        store,
        snapshots.clone(),
        settings.file_pattern(),
    ));

    // Initial sync fires on the first tick
    let sync_task = spawn_sync_loop(orchestrator.clone(), settings.sync_interval());

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    // Create shared application state
    let app_state = web::Data::new(AppState {
        snapshots,
        sync: orchestrator,
    });

    // Configure and start HTTP server
    let served = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "bsb-lookup"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
                    .add(("Access-Control-Allow-Origin", "*"))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await;

    sync_task.abort();
    info!("BSB lookup service stopped");

    served.context("HTTP server error")
}
