use std::collections::HashSet;

use rust_client::domain::MeterError;
use serde::Serialize;

use super::RECEIPT_WINDOW;
use crate::store::{DashboardStore, StoreError};

/// Stored status value of a reporting meter.
pub const ACTIVE_STATUS: &str = "activo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    #[serde(rename = "consumo")]
    pub consumption: i64,
    #[serde(rename = "reportando")]
    pub reporting: i64,
    #[serde(rename = "errores")]
    pub errors: usize,
}

/// Number of distinct meters with at least one unresolved error.
pub fn meters_with_open_errors(errors: &[MeterError]) -> usize {
    errors
        .iter()
        .filter(|e| !e.resolved)
        .map(|e| e.meter_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub async fn city_stats(store: &dyn DashboardStore) -> Result<CityStats, StoreError> {
    let receipts = store.recent_receipts(RECEIPT_WINDOW).await?;
    let total: f64 = receipts
        .iter()
        .filter_map(|r| r.consumption_m3)
        .filter(|m3| m3.is_finite())
        .sum();

    let reporting = store.count_meters_with_status(ACTIVE_STATUS).await?;
    let errors = store.unresolved_meter_errors().await?;

    Ok(CityStats {
        consumption: total.round() as i64,
        reporting,
        errors: meters_with_open_errors(&errors),
    })
}
