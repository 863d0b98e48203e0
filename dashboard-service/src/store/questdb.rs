use rust_client::{
    db::dashboard_queries as q,
    domain::{District, InfrastructureSite, Meter, MeterError, MeterReading, Receipt, User, Zone},
};
use sqlx::postgres::PgPool;

use super::{DashboardStore, StoreError};

/// [`DashboardStore`] backed by QuestDB over the Postgres wire protocol.
#[derive(Clone)]
pub struct QuestDbStore {
    pool: PgPool,
}

impl QuestDbStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DashboardStore for QuestDbStore {
    async fn users(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        Ok(q::users(&self.pool, limit).await?)
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(q::all_users(&self.pool).await?)
    }

    async fn recent_receipts(&self, limit: i64) -> Result<Vec<Receipt>, StoreError> {
        Ok(q::recent_receipts(&self.pool, limit).await?)
    }

    async fn meter_infrastructure(&self, meter_id: &str) -> Result<Option<String>, StoreError> {
        Ok(q::meter_infrastructure(&self.pool, meter_id).await?)
    }

    async fn infrastructure_zone(&self, infrastructure_id: &str) -> Result<Option<String>, StoreError> {
        Ok(q::infrastructure_zone(&self.pool, infrastructure_id).await?)
    }

    async fn zone_name(&self, zone_id: &str) -> Result<Option<String>, StoreError> {
        Ok(q::zone_name(&self.pool, zone_id).await?)
    }

    async fn all_meters(&self) -> Result<Vec<Meter>, StoreError> {
        Ok(q::all_meters(&self.pool).await?)
    }

    async fn meters_for_user(&self, user_id: &str) -> Result<Vec<Meter>, StoreError> {
        Ok(q::meters_for_user(&self.pool, user_id).await?)
    }

    async fn count_meters_with_status(&self, status: &str) -> Result<i64, StoreError> {
        Ok(q::count_meters_with_status(&self.pool, status).await?)
    }

    async fn unresolved_meter_errors(&self) -> Result<Vec<MeterError>, StoreError> {
        Ok(q::unresolved_meter_errors(&self.pool).await?)
    }

    async fn all_infrastructures(&self) -> Result<Vec<InfrastructureSite>, StoreError> {
        Ok(q::all_infrastructures(&self.pool).await?)
    }

    async fn all_zones(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(q::all_zones(&self.pool).await?)
    }

    async fn all_districts(&self) -> Result<Vec<District>, StoreError> {
        Ok(q::all_districts(&self.pool).await?)
    }

    async fn latest_readings(&self, meter_id: &str, limit: i64) -> Result<Vec<MeterReading>, StoreError> {
        Ok(q::latest_readings(&self.pool, meter_id, limit).await?)
    }
}
