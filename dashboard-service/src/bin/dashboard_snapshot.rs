use std::{env, sync::Arc};

use anyhow::{bail, Result};
use dashboard_service::{
    aggregate::{customers, meter_map, monthly, per_capita, stats, zones},
    config::AppConfig,
    observability,
    store::{DashboardStore, QuestDbStore},
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

/// Compute every dashboard view once and print it as a single JSON document.
fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        bail!("usage: dashboard_snapshot [--pretty]");
    }
    let pretty = args.get(1).is_some_and(|a| a == "--pretty");

    let cfg = AppConfig::load()?;
    let offset = cfg.reporting.resolve_offset()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            let pool = PgPoolOptions::new()
                .max_connections(cfg.questdb.max_connections)
                .connect(&cfg.questdb.uri)
                .await?;
            let store: Arc<dyn DashboardStore> = Arc::new(QuestDbStore::new(pool));
            let store = store.as_ref();

            let snapshot = json!({
                "topzonas": zones::top_zones(store, cfg.meter_map.lookup_concurrency).await?,
                "consumo_promedio": per_capita::average_per_capita(store).await?,
                "consumo_mensual": monthly::monthly_consumption(store, offset).await?,
                "estadisticas": stats::city_stats(store).await?,
                "clientes": customers::customer_listing(store).await?,
                "medidores_posicion": meter_map::meter_markers(store, &cfg.meter_map, offset).await?,
            });

            let out = if pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{out}");

            tracing::info!("dashboard snapshot written");
            Ok::<(), anyhow::Error>(())
        })
}
