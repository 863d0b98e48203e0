//! Read-only access to the record sets behind the dashboard.
//!
//! The pipeline only talks to [`DashboardStore`]; the process-wide QuestDB
//! pool lives in [`QuestDbStore`] and is handed to the HTTP state once at
//! start-up.

use rust_client::domain::{District, InfrastructureSite, Meter, MeterError, MeterReading, Receipt, User, Zone};

pub mod questdb;

#[cfg(test)]
pub mod memory;

pub use questdb::QuestDbStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    DataAccess(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError::DataAccess(e.to_string())
    }
}

#[async_trait::async_trait]
pub trait DashboardStore: Send + Sync {
    async fn users(&self, limit: i64) -> Result<Vec<User>, StoreError>;

    async fn all_users(&self) -> Result<Vec<User>, StoreError>;

    async fn recent_receipts(&self, limit: i64) -> Result<Vec<Receipt>, StoreError>;

    async fn meter_infrastructure(&self, meter_id: &str) -> Result<Option<String>, StoreError>;

    async fn infrastructure_zone(&self, infrastructure_id: &str) -> Result<Option<String>, StoreError>;

    async fn zone_name(&self, zone_id: &str) -> Result<Option<String>, StoreError>;

    async fn all_meters(&self) -> Result<Vec<Meter>, StoreError>;

    async fn meters_for_user(&self, user_id: &str) -> Result<Vec<Meter>, StoreError>;

    async fn count_meters_with_status(&self, status: &str) -> Result<i64, StoreError>;

    async fn unresolved_meter_errors(&self) -> Result<Vec<MeterError>, StoreError>;

    async fn all_infrastructures(&self) -> Result<Vec<InfrastructureSite>, StoreError>;

    async fn all_zones(&self) -> Result<Vec<Zone>, StoreError>;

    async fn all_districts(&self) -> Result<Vec<District>, StoreError>;

    /// Newest `limit` readings for `meter_id`, newest first.
    async fn latest_readings(&self, meter_id: &str, limit: i64) -> Result<Vec<MeterReading>, StoreError>;
}
