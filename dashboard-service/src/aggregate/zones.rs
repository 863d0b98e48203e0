use std::collections::HashMap;

use futures::{stream, StreamExt, TryStreamExt};
use rust_client::domain::Receipt;
use serde::Serialize;

use super::{present, round2, RECEIPT_WINDOW};
use crate::store::{DashboardStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneConsumption {
    #[serde(rename = "nombre")]
    pub zone_name: String,
    #[serde(rename = "valor")]
    pub total: f64,
}

/// Sum consumption per meter, keeping the order in which meters first appear.
///
/// Receipts without a meter id or a consumption value are skipped.
pub fn consumption_by_meter(receipts: &[Receipt]) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for r in receipts {
        let (Some(meter_id), Some(m3)) = (present(r.meter_id.as_deref()), r.consumption_m3) else {
            continue;
        };
        if !m3.is_finite() {
            continue;
        }
        match index.get(meter_id) {
            Some(&i) => totals[i].1 += m3,
            None => {
                index.insert(meter_id, totals.len());
                totals.push((meter_id.to_string(), m3));
            }
        }
    }

    totals
}

/// Fold per-meter totals into per-zone totals.
///
/// Meters missing from `zone_of` have no resolvable zone and contribute
/// nothing. Zones keep the order of the first meter that reached them.
pub fn fold_by_zone(per_meter: &[(String, f64)], zone_of: &HashMap<String, String>) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for (meter_id, m3) in per_meter {
        let Some(zone_id) = zone_of.get(meter_id) else {
            continue;
        };
        match index.get(zone_id.as_str()) {
            Some(&i) => totals[i].1 += m3,
            None => {
                index.insert(zone_id.as_str(), totals.len());
                totals.push((zone_id.clone(), *m3));
            }
        }
    }

    totals
}

/// Attach display names, round, and sort descending.
///
/// The sort is stable so zones with equal totals keep their fold order.
pub fn rank_zones(per_zone: Vec<(String, f64)>, names: &HashMap<String, String>) -> Vec<ZoneConsumption> {
    let mut ranked: Vec<ZoneConsumption> = per_zone
        .into_iter()
        .map(|(zone_id, total)| ZoneConsumption {
            zone_name: names.get(&zone_id).cloned().unwrap_or(zone_id),
            total: round2(total),
        })
        .collect();

    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked
}

async fn resolve_zone(store: &dyn DashboardStore, meter_id: &str) -> Result<Option<String>, StoreError> {
    let infra = store.meter_infrastructure(meter_id).await?;
    let Some(infra) = present(infra.as_deref()) else {
        return Ok(None);
    };
    let zone = store.infrastructure_zone(infra).await?;
    Ok(present(zone.as_deref()).map(str::to_string))
}

/// Consumption per zone over the recent receipt window.
///
/// Meter and zone lookups run with at most `concurrency` in flight. Results
/// come back in input order, so the output does not depend on timing. Any
/// lookup failure fails the whole view.
pub async fn top_zones(store: &dyn DashboardStore, concurrency: usize) -> Result<Vec<ZoneConsumption>, StoreError> {
    let receipts = store.recent_receipts(RECEIPT_WINDOW).await?;
    let per_meter = consumption_by_meter(&receipts);

    let resolved: Vec<(&str, Option<String>)> = stream::iter(per_meter.iter().filter(|(_, m3)| *m3 != 0.0))
        .map(|(meter_id, _)| async move {
            let zone = resolve_zone(store, meter_id).await?;
            Ok::<_, StoreError>((meter_id.as_str(), zone))
        })
        .boxed()
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut zone_of: HashMap<String, String> = HashMap::with_capacity(resolved.len());
    let mut dropped = 0u64;
    for (meter_id, zone) in resolved {
        match zone {
            Some(zone_id) => {
                zone_of.insert(meter_id.to_string(), zone_id);
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        metrics::counter!("dashboard_orphan_meters_dropped_total").increment(dropped);
        tracing::debug!(dropped, "meters without a resolvable zone left out of zone totals");
    }

    let per_zone = fold_by_zone(&per_meter, &zone_of);

    let names: HashMap<String, String> = stream::iter(per_zone.iter())
        .map(|(zone_id, _)| async move {
            let name = store.zone_name(zone_id).await?;
            Ok::<_, StoreError>(name.map(|n| (zone_id.clone(), n)))
        })
        .boxed()
        .buffered(concurrency.max(1))
        .try_filter_map(|entry| async move { Ok::<_, StoreError>(entry) })
        .try_collect()
        .await?;

    let ranked = rank_zones(per_zone, &names);
    tracing::info!(
        zones = ?ranked.iter().map(|z| z.zone_name.as_str()).collect::<Vec<_>>(),
        "zones with consumption data"
    );
    Ok(ranked)
}
