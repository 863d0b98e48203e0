//! In-memory store used by the pipeline and HTTP tests.

use rust_client::domain::{District, InfrastructureSite, Meter, MeterError, MeterReading, Receipt, User, Zone};
use time::OffsetDateTime;

use super::{DashboardStore, StoreError};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub users: Vec<User>,
    pub receipts: Vec<Receipt>,
    pub meters: Vec<Meter>,
    pub infrastructures: Vec<InfrastructureSite>,
    pub zones: Vec<Zone>,
    pub districts: Vec<District>,
    pub errors: Vec<MeterError>,
    pub readings: Vec<MeterReading>,
    /// When set, every read fails with this message.
    pub failure: Option<String>,
}

impl MemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(msg) => Err(StoreError::DataAccess(msg.clone())),
            None => Ok(()),
        }
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        user_id: id.to_string(),
        name: Some(name.to_string()),
    }
}

pub fn receipt(meter_id: &str, consumption_m3: f64, issued_at: OffsetDateTime) -> Receipt {
    Receipt {
        receipt_id: None,
        user_id: None,
        meter_id: Some(meter_id.to_string()),
        consumption_m3: Some(consumption_m3),
        issued_at: Some(issued_at),
    }
}

pub fn meter(meter_id: &str, user_id: Option<&str>, infrastructure_id: Option<&str>) -> Meter {
    Meter {
        meter_id: meter_id.to_string(),
        user_id: user_id.map(str::to_string),
        infrastructure_id: infrastructure_id.map(str::to_string),
        model: None,
        status: Some("activo".to_string()),
    }
}

pub fn site(id: &str, coords: Option<(f64, f64)>, zone_id: Option<&str>, district_id: Option<&str>) -> InfrastructureSite {
    InfrastructureSite {
        infrastructure_id: id.to_string(),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        zone_id: zone_id.map(str::to_string),
        district_id: district_id.map(str::to_string),
    }
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        zone_id: id.to_string(),
        name: Some(name.to_string()),
    }
}

pub fn district(id: &str, name: &str, inhabitants: i64) -> District {
    District {
        district_id: id.to_string(),
        name: Some(name.to_string()),
        inhabitants: Some(inhabitants),
    }
}

pub fn reading(meter_id: &str, ts: OffsetDateTime, flow_lps: f64) -> MeterReading {
    MeterReading {
        meter_id: meter_id.to_string(),
        ts,
        flow_lps: Some(flow_lps),
    }
}

fn take<T: Clone>(rows: &[T], limit: i64) -> Vec<T> {
    rows.iter().take(limit.max(0) as usize).cloned().collect()
}

#[async_trait::async_trait]
impl DashboardStore for MemoryStore {
    async fn users(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(take(&self.users, limit))
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.clone())
    }

    async fn recent_receipts(&self, limit: i64) -> Result<Vec<Receipt>, StoreError> {
        self.check()?;
        Ok(take(&self.receipts, limit))
    }

    async fn meter_infrastructure(&self, meter_id: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self
            .meters
            .iter()
            .find(|m| m.meter_id == meter_id)
            .and_then(|m| m.infrastructure_id.clone()))
    }

    async fn infrastructure_zone(&self, infrastructure_id: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self
            .infrastructures
            .iter()
            .find(|i| i.infrastructure_id == infrastructure_id)
            .and_then(|i| i.zone_id.clone()))
    }

    async fn zone_name(&self, zone_id: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self
            .zones
            .iter()
            .find(|z| z.zone_id == zone_id)
            .and_then(|z| z.name.clone()))
    }

    async fn all_meters(&self) -> Result<Vec<Meter>, StoreError> {
        self.check()?;
        Ok(self.meters.clone())
    }

    async fn meters_for_user(&self, user_id: &str) -> Result<Vec<Meter>, StoreError> {
        self.check()?;
        Ok(self
            .meters
            .iter()
            .filter(|m| m.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn count_meters_with_status(&self, status: &str) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self
            .meters
            .iter()
            .filter(|m| m.status.as_deref() == Some(status))
            .count() as i64)
    }

    async fn unresolved_meter_errors(&self) -> Result<Vec<MeterError>, StoreError> {
        self.check()?;
        Ok(self.errors.iter().filter(|e| !e.resolved).cloned().collect())
    }

    async fn all_infrastructures(&self) -> Result<Vec<InfrastructureSite>, StoreError> {
        self.check()?;
        Ok(self.infrastructures.clone())
    }

    async fn all_zones(&self) -> Result<Vec<Zone>, StoreError> {
        self.check()?;
        Ok(self.zones.clone())
    }

    async fn all_districts(&self) -> Result<Vec<District>, StoreError> {
        self.check()?;
        Ok(self.districts.clone())
    }

    async fn latest_readings(&self, meter_id: &str, limit: i64) -> Result<Vec<MeterReading>, StoreError> {
        self.check()?;
        let mut rows: Vec<MeterReading> = self
            .readings
            .iter()
            .filter(|r| r.meter_id == meter_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.ts.cmp(&a.ts));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}
