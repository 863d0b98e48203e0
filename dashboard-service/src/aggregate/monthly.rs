use rust_client::domain::Receipt;
use serde::Serialize;
use time::UtcOffset;

use super::{round2, RECEIPT_WINDOW};
use crate::store::{DashboardStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    #[serde(rename = "mes")]
    pub month: u8,
    pub total: f64,
}

/// Fold receipts into calendar-month totals (1..=12), ascending by month.
///
/// The month is read in `offset`, the configured reporting calendar, not in
/// UTC. Months without a non-zero receipt are left out; callers zero-fill
/// for display.
pub fn fold_by_month(receipts: &[Receipt], offset: UtcOffset) -> Vec<MonthlyTotal> {
    let mut totals = [0.0f64; 12];
    let mut seen = [false; 12];

    for r in receipts {
        let (Some(issued_at), Some(m3)) = (r.issued_at, r.consumption_m3) else {
            continue;
        };
        // Zero readings do not count as a contributing receipt.
        if !m3.is_finite() || m3 == 0.0 {
            continue;
        }
        let slot = u8::from(issued_at.to_offset(offset).month()) as usize - 1;
        totals[slot] += m3;
        seen[slot] = true;
    }

    (0..12)
        .filter(|&i| seen[i])
        .map(|i| MonthlyTotal {
            month: i as u8 + 1,
            total: round2(totals[i]),
        })
        .collect()
}

pub async fn monthly_consumption(store: &dyn DashboardStore, offset: UtcOffset) -> Result<Vec<MonthlyTotal>, StoreError> {
    let receipts = store.recent_receipts(RECEIPT_WINDOW).await?;
    Ok(fold_by_month(&receipts, offset))
}
