use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flocklog_backend::backend::domain::flock_service::FlockService;
use flocklog_backend::backend::domain::laying_service::LayingService;
use flocklog_backend::backend::domain::record_service::RecordService;
use flocklog_backend::backend::domain::session_service::SessionService;
use flocklog_backend::backend::io::rest::{router, AppState};
use flocklog_backend::backend::storage::csv::CsvConnection;
use flocklog_backend::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load(Path::new("flocklog.yaml"))?;

    info!("Setting up storage");
    let connection = match &config.data_dir {
        Some(dir) => CsvConnection::new(dir)?,
        None => CsvConnection::new_default()?,
    };

    // Catalogs are read-only and loaded once per process
    let catalogs = Arc::new(config.catalogs());

    let flock_service = FlockService::new(connection.clone());
    let record_service =
        RecordService::new(connection.clone(), flock_service.clone(), catalogs.clone());
    let laying_service = LayingService::new(connection.clone(), flock_service.clone());
    let session_service = SessionService::new(connection, config.credentials());

    let state = AppState {
        flock_service,
        record_service,
        laying_service,
        session_service,
        catalogs,
    };

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
