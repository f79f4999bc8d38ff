pub mod api;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use api::server::ServerError;
use db::DatabaseError;
use export::MirrorExporter;
use service::RecordService;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Initialize tracing, open the store, and run the server until ctrl-c.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // Store handle is opened once at startup and owned by the service
    // for the process lifetime.
    let conn = db::open_database(&config::database_path())?;
    let exporter = MirrorExporter::new(config::export_dir());
    let service = Arc::new(RecordService::new(conn, exporter));

    let mut server = api::start_server(service, config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown().await;

    Ok(())
}
