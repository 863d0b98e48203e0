use serde::Serialize;

use super::{round2, RECEIPT_WINDOW};
use crate::store::{DashboardStore, StoreError};

/// Billing period assumed when turning a receipt total into a daily figure.
pub const BILLING_PERIOD_DAYS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerCapitaConsumption {
    /// Liters per inhabitant per day.
    pub valor: f64,
}

/// `m3 * 1000 / (inhabitants * 30)`, or `0` when the districts sum to zero
/// inhabitants. Other totals, negative ones included, are divided through.
pub fn liters_per_inhabitant_day(total_m3: f64, inhabitants: i64) -> f64 {
    if inhabitants == 0 {
        return 0.0;
    }
    round2(total_m3 * 1000.0 / (inhabitants as f64 * BILLING_PERIOD_DAYS))
}

pub async fn average_per_capita(store: &dyn DashboardStore) -> Result<PerCapitaConsumption, StoreError> {
    let receipts = store.recent_receipts(RECEIPT_WINDOW).await?;
    let total_m3: f64 = receipts
        .iter()
        .filter_map(|r| r.consumption_m3)
        .filter(|m3| m3.is_finite())
        .sum();

    let districts = store.all_districts().await?;
    let inhabitants: i64 = districts.iter().filter_map(|d| d.inhabitants).sum();

    Ok(PerCapitaConsumption {
        valor: liters_per_inhabitant_day(total_m3, inhabitants),
    })
}
