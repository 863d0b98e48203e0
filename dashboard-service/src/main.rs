use std::sync::Arc;

use anyhow::Result;
use dashboard_service::{
    api::{self, AppState, Settings},
    config::AppConfig,
    metrics_server, observability,
    store::{DashboardStore, QuestDbStore},
};
use sqlx::postgres::PgPoolOptions;
use time::UtcOffset;
use tokio::signal;

fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    // Read the local offset before the runtime spawns worker threads.
    let reporting_offset = cfg.reporting.resolve_offset()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cfg, reporting_offset))
}

async fn run(cfg: AppConfig, reporting_offset: UtcOffset) -> Result<()> {
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // One pool for the life of the process, shared by every request.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.questdb.max_connections)
        .connect(&cfg.questdb.uri)
        .await?;
    let store: Arc<dyn DashboardStore> = Arc::new(QuestDbStore::new(pool));

    let state = AppState::new(store, Settings::from_config(&cfg, reporting_offset));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr).await?;
    tracing::info!(
        addr = %cfg.http.bind_addr,
        %reporting_offset,
        map_owners = cfg.meter_map.user_ids.len(),
        "dashboard API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dashboard API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received terminate signal, shutting down"),
    }
}
