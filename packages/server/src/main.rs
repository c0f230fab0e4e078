use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::ai::build_extractor;
use common::storage::FilesystemDocumentStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::{AppConfig, BillingBackend};
use server::repository::{BillRepository, DatabaseBillRepository, InMemoryBillRepository};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let documents = FilesystemDocumentStore::new(
        &config.storage.data_dir,
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to open document store")?;

    let extractor = build_extractor(&config.ai).context("Failed to build AI client")?;

    let bills: Arc<dyn BillRepository> = match config.billing.backend {
        BillingBackend::Memory => Arc::new(InMemoryBillRepository::new()),
        BillingBackend::Database => Arc::new(DatabaseBillRepository::new(db.clone())),
    };
    if config.billing.seed_demo_data {
        server::seed::seed_demo_bills(&*bills)
            .await
            .context("Failed to seed demo bills")?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        documents: Arc::new(documents),
        extractor,
        bills,
    };

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
