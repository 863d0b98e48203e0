use rust_client::domain::Receipt;
use serde::Serialize;
use time::{macros::format_description, UtcOffset};

use super::{lookup::ReferenceTables, present, UNKNOWN_CUSTOMER};
use crate::store::{DashboardStore, StoreError};

/// Receipts listed in the customer table.
pub const CUSTOMER_WINDOW: i64 = 100;

/// One receipt with its customer and geography resolved.
///
/// Unlike the zone ranking, a broken join never drops the row: the missing
/// geography is reported as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRow {
    #[serde(rename = "medidor_id")]
    pub meter_id: Option<String>,
    #[serde(rename = "nombre")]
    pub customer_name: String,
    #[serde(rename = "zona")]
    pub zone_name: Option<String>,
    #[serde(rename = "distrito")]
    pub district_name: Option<String>,
    /// `YYYY-MM-DD` of the issue instant in UTC.
    #[serde(rename = "fecha")]
    pub date: Option<String>,
    #[serde(rename = "consumo")]
    pub consumption: f64,
}

pub fn customer_row(receipt: &Receipt, tables: &ReferenceTables) -> CustomerRow {
    let site = tables.site_of_meter(receipt.meter_id.as_deref());
    let date_format = format_description!("[year]-[month]-[day]");

    CustomerRow {
        meter_id: present(receipt.meter_id.as_deref()).map(str::to_string),
        customer_name: tables
            .user_name(receipt.user_id.as_deref())
            .unwrap_or(UNKNOWN_CUSTOMER)
            .to_string(),
        zone_name: site
            .and_then(|s| tables.zone_name(s.zone_id.as_deref()))
            .map(str::to_string),
        district_name: site
            .and_then(|s| tables.district_name(s.district_id.as_deref()))
            .map(str::to_string),
        date: receipt
            .issued_at
            .and_then(|ts| ts.to_offset(UtcOffset::UTC).format(&date_format).ok()),
        consumption: receipt.consumption_m3.filter(|m3| m3.is_finite()).unwrap_or(0.0),
    }
}

/// Denormalized listing of the most recent receipts.
pub async fn customer_listing(store: &dyn DashboardStore) -> Result<Vec<CustomerRow>, StoreError> {
    let receipts = store.recent_receipts(CUSTOMER_WINDOW).await?;

    let (users, meters, sites, zones, districts) = tokio::try_join!(
        store.all_users(),
        store.all_meters(),
        store.all_infrastructures(),
        store.all_zones(),
        store.all_districts(),
    )?;

    let tables = ReferenceTables::default()
        .with_users(users)
        .with_meters(&meters)
        .with_sites(sites)
        .with_zones(zones)
        .with_districts(districts);

    Ok(receipts.iter().map(|r| customer_row(r, &tables)).collect())
}
