use coinboard_api::schema::build_schema;
use coinboard_api::{ApiConfig, ApiServer, AppState};
use coinboard_core::AppConfig;
use coinboard_db::{DatabaseConfig, DatabasePool};
use coinboard_metrics::{MetricsConfig, MetricsServer};
use coinboard_store::MemoryStore;
use coinboard_sync::{
    CoinGeckoClient, MarketStore, PgMarketStore, SyncActions, SyncScheduler, Synchronizer,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("coinboard_sync=info".parse()?)
                .add_directive("coinboard_api=info".parse()?),
        )
        .init();

    info!("Coinboard sync service starting...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Metrics recorder first so early syncs are counted
    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        match coinboard_metrics::init() {
            Ok(handle) => {
                let metrics_server = MetricsServer::new(metrics_config, handle);
                tokio::spawn(async move {
                    if let Err(e) = metrics_server.run().await {
                        error!(error = %e, "Metrics server error");
                    }
                });
                info!("Metrics server started");
            }
            Err(e) => warn!(error = %e, "Failed to install metrics recorder"),
        }
    }

    // Database is optional; without it everything lives in memory
    let db_pool = match std::env::var("DATABASE_URL") {
        Ok(_) => {
            let db_config = DatabaseConfig::from_env()?;
            match DatabasePool::new(&db_config).await {
                Ok(pool) => {
                    if let Err(e) = pool.migrate().await {
                        error!(error = %e, "Failed to run database migrations");
                        std::process::exit(1);
                    }
                    info!("Database connected and migrations applied");
                    Some(Arc::new(pool))
                }
                Err(e) => {
                    error!(error = %e, "Failed to connect to database");
                    std::process::exit(1);
                }
            }
        }
        Err(_) => {
            warn!("DATABASE_URL not set, running without persistence");
            None
        }
    };

    let store: Arc<dyn MarketStore> = match db_pool.clone() {
        Some(db) => Arc::new(PgMarketStore::new(db)),
        None => Arc::new(MemoryStore::new()),
    };

    let provider = match CoinGeckoClient::new(config.provider.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to build market data client");
            std::process::exit(1);
        }
    };

    let synchronizer = Synchronizer::new(provider, store.clone(), config.sync.clone());
    let runs = synchronizer.runs().clone();
    let actions: Arc<dyn SyncActions> = Arc::new(synchronizer);

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received (Ctrl+C)");
        shutdown_tx_clone.send(()).ok();
    });

    let scheduler_handle = if config.scheduler.enabled {
        let scheduler = SyncScheduler::new(actions.clone(), config.scheduler.clone());
        Some(tokio::spawn(scheduler.run(shutdown_tx.subscribe())))
    } else {
        info!("Scheduler disabled, syncs run only when triggered");
        None
    };

    let state = AppState {
        actions,
        cron: config.cron.clone(),
        schema: build_schema(store, runs),
    };
    let api_server = ApiServer::new(ApiConfig::from_env(), state);
    if let Err(e) = api_server.run(shutdown_rx).await {
        error!(error = %e, "API server error");
        std::process::exit(1);
    }

    info!("Shutting down...");

    if let Some(handle) = scheduler_handle {
        handle.await.ok();
    }

    if let Some(db) = db_pool {
        db.close().await;
        info!("Database connections closed");
    }

    info!("Coinboard sync service shutdown complete");
    Ok(())
}
