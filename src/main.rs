use anyhow::Context;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};

use menu_catalog::{
    create_app, init_observability,
    observability::{Metrics, QueryTracer},
    repositories::{
        create_pool, InMemoryCatalog, PgDishRepository, PgMenuRepository, PgSubmenuRepository,
        SchemaManager,
    },
    shutdown_observability, AppState, Config, StorageBackend,
};

const POOL_GAUGE_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment().context("failed to load configuration")?;

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.otlp_endpoint.as_deref(),
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let metrics = Arc::new(Metrics::new()?);

    let state = match config.database.storage_backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            let catalog = Arc::new(InMemoryCatalog::new());
            AppState::new(catalog.clone(), catalog.clone(), catalog, metrics.clone())
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .database_url
                .as_deref()
                .context("database url is required for the postgres backend")?;
            let pool = create_pool(
                url,
                config.database.max_connections,
                config.database.acquire_timeout(),
            )
            .await
            .context("failed to connect to the database")?;

            let schema = SchemaManager::new(pool.clone());
            if config.database.reset_schema_on_startup {
                schema.reset_schema().await?;
            } else {
                schema.create_schema().await?;
            }

            let gauge_pool = pool.clone();
            let gauge_metrics = metrics.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(POOL_GAUGE_INTERVAL);
                loop {
                    interval.tick().await;
                    gauge_metrics.set_active_connections(f64::from(gauge_pool.size()));
                }
            });

            let tracer = QueryTracer::new(metrics.clone());
            AppState::new(
                Arc::new(PgMenuRepository::new(pool.clone(), tracer.clone())),
                Arc::new(PgSubmenuRepository::new(pool.clone(), tracer.clone())),
                Arc::new(PgDishRepository::new(pool, tracer)),
                metrics.clone(),
            )
        }
    };
    info!("Services initialized successfully");

    let app = create_app(state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_observability().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
