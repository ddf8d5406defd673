//! Currency Atlas API server entry point.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;

use currency_atlas_api::app::build_router;
use currency_atlas_api::auth::{AdminCredentials, SessionRegistry};
use currency_atlas_api::config::{AppConfig, StoreBackend};
use currency_atlas_api::error::AppError;
use currency_atlas_api::state::AppState;
use currency_atlas_api::telemetry;
use currency_atlas_core::clock::SystemClock;
use currency_atlas_core::store::EventStore;
use currency_atlas_registry::RegistryService;
use currency_atlas_registry::domain::admin::AdminAuthenticator;
use currency_atlas_store::{InMemoryEventStore, JsonFileEventStore, LocalBlobUploader, PgEventStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Currency Atlas API server");

    let store = open_store(&config.store_backend).await?;
    let palette = config.load_palette()?;
    let clock = Arc::new(SystemClock);
    let registry = RegistryService::new(
        clock.clone(),
        Arc::new(AdminAuthenticator::new(&config.admin_email)),
        Arc::new(LocalBlobUploader::new(
            config.upload_dir.clone(),
            &config.public_base_url,
        )),
        store,
        palette,
    );
    let credentials = AdminCredentials::new(&config.admin_email, &config.admin_password);
    let sessions = SessionRegistry::new(clock, config.session_ttl);
    let app = build_router(
        AppState::new(registry, credentials, sessions),
        &config.upload_dir,
        config.max_upload_bytes,
    );

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Server)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    if let Some(provider) = provider {
        provider
            .shutdown()
            .map_err(|e| AppError::Telemetry(e.to_string()))?;
    }
    Ok(())
}

async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn EventStore>, AppError> {
    let store: Arc<dyn EventStore> = match backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory event store; events are lost on restart");
            Arc::new(InMemoryEventStore::new())
        }
        StoreBackend::File(path) => {
            tracing::info!(path = %path.display(), "using JSON file event store");
            Arc::new(JsonFileEventStore::new(path.clone()))
        }
        StoreBackend::Postgres(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;
            sqlx::migrate!("../../migrations").run(&pool).await?;
            tracing::info!("using PostgreSQL event store");
            Arc::new(PgEventStore::new(pool))
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
