use futures::{stream, StreamExt, TryStreamExt};
use rust_client::domain::{Meter, MeterReading};
use serde::Serialize;
use time::UtcOffset;

use super::{lookup::ReferenceTables, present, round2, UNKNOWN_CUSTOMER};
use crate::{
    config::MeterMapConfig,
    store::{DashboardStore, StoreError},
};

pub const HOUR_SLOTS: usize = 12;

/// Placeholder for an unresolved zone or district.
pub const MISSING_PLACE: &str = "-";

/// Placeholder for a meter without an owner.
pub const MISSING_ACCOUNT: &str = "------";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterMarker {
    pub id: usize,
    /// `[latitude, longitude]`
    #[serde(rename = "posicion")]
    pub position: [f64; 2],
    #[serde(rename = "datos")]
    pub details: MarkerDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDetails {
    #[serde(rename = "cuenta")]
    pub account: String,
    #[serde(rename = "nombre")]
    pub owner_name: String,
    #[serde(rename = "distrito")]
    pub district: String,
    #[serde(rename = "categoria")]
    pub zone: String,
    #[serde(rename = "medidor")]
    pub meter_label: String,
    /// Average flow (l/s) per `hour % 12` slot.
    #[serde(rename = "consumo")]
    pub hourly_flow: [f64; HOUR_SLOTS],
}

/// Which meters are placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MeterSelection {
    /// Meters owned by these users, in list order.
    Owners(Vec<String>),
    All,
}

impl MeterSelection {
    pub fn from_config(cfg: &MeterMapConfig) -> Self {
        if cfg.user_ids.is_empty() {
            MeterSelection::All
        } else {
            MeterSelection::Owners(cfg.user_ids.clone())
        }
    }

    async fn candidates(&self, store: &dyn DashboardStore) -> Result<Vec<Meter>, StoreError> {
        match self {
            MeterSelection::All => store.all_meters().await,
            MeterSelection::Owners(user_ids) => {
                let mut meters = Vec::new();
                for user_id in user_ids {
                    meters.extend(store.meters_for_user(user_id).await?);
                }
                Ok(meters)
            }
        }
    }
}

/// Bucket readings by `hour % 12` in the reporting offset and average each slot.
///
/// A reading without a flow value counts as `0`. Empty slots stay `0`.
pub fn hourly_profile(readings: &[MeterReading], offset: UtcOffset) -> [f64; HOUR_SLOTS] {
    let mut sums = [0.0f64; HOUR_SLOTS];
    let mut counts = [0u32; HOUR_SLOTS];

    for r in readings {
        let slot = r.ts.to_offset(offset).hour() as usize % HOUR_SLOTS;
        sums[slot] += r.flow_lps.filter(|v| v.is_finite()).unwrap_or(0.0);
        counts[slot] += 1;
    }

    let mut profile = [0.0f64; HOUR_SLOTS];
    for slot in 0..HOUR_SLOTS {
        if counts[slot] > 0 {
            profile[slot] = round2(sums[slot] / counts[slot] as f64);
        }
    }
    profile
}

/// Short meter label: first six characters of the id and the model.
pub fn meter_label(meter_id: &str, model: Option<&str>) -> String {
    let short: String = meter_id.chars().take(6).collect();
    format!("{short} ({})", present(model).unwrap_or(MISSING_PLACE))
}

struct Placed<'a> {
    id: usize,
    meter: &'a Meter,
    position: [f64; 2],
}

fn place<'a>(index: usize, meter: &'a Meter, tables: &ReferenceTables) -> Option<Placed<'a>> {
    let site = tables.site(meter.infrastructure_id.as_deref())?;
    let (Some(lat), Some(lon)) = (site.latitude, site.longitude) else {
        return None;
    };
    Some(Placed {
        id: index + 1,
        meter,
        position: [lat, lon],
    })
}

fn marker(placed: &Placed<'_>, readings: &[MeterReading], tables: &ReferenceTables, offset: UtcOffset) -> MeterMarker {
    let meter = placed.meter;
    let site = tables.site(meter.infrastructure_id.as_deref());
    let owner = present(meter.user_id.as_deref());

    MeterMarker {
        id: placed.id,
        position: placed.position,
        details: MarkerDetails {
            account: owner.unwrap_or(MISSING_ACCOUNT).to_string(),
            owner_name: tables.user_name(owner).unwrap_or(UNKNOWN_CUSTOMER).to_string(),
            district: site
                .and_then(|s| tables.district_name(s.district_id.as_deref()))
                .unwrap_or(MISSING_PLACE)
                .to_string(),
            zone: site
                .and_then(|s| tables.zone_name(s.zone_id.as_deref()))
                .unwrap_or(MISSING_PLACE)
                .to_string(),
            meter_label: meter_label(&meter.meter_id, meter.model.as_deref()),
            hourly_flow: hourly_profile(readings, offset),
        },
    }
}

/// Map markers for the selected meters, each with its recent hourly flow.
///
/// Meters whose site is missing or has no coordinates never appear. Marker
/// ids are 1-based positions in the candidate list, so skipped meters leave
/// gaps in the numbering.
pub async fn meter_markers(
    store: &dyn DashboardStore,
    cfg: &MeterMapConfig,
    offset: UtcOffset,
) -> Result<Vec<MeterMarker>, StoreError> {
    let (sites, users, zones, districts) = tokio::try_join!(
        store.all_infrastructures(),
        store.all_users(),
        store.all_zones(),
        store.all_districts(),
    )?;
    let tables = ReferenceTables::default()
        .with_sites(sites)
        .with_users(users)
        .with_zones(zones)
        .with_districts(districts);

    let candidates = MeterSelection::from_config(cfg).candidates(store).await?;
    let placed: Vec<Placed<'_>> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, m)| place(i, m, &tables))
        .collect();

    let readings_per_meter = cfg.readings_per_meter.max(1);
    let markers: Vec<MeterMarker> = stream::iter(placed.iter())
        .map(|p| {
            let tables = &tables;
            async move {
                let readings = store.latest_readings(&p.meter.meter_id, readings_per_meter).await?;
                Ok::<_, StoreError>(marker(p, &readings, tables, offset))
            }
        })
        .boxed()
        .buffered(cfg.lookup_concurrency.max(1))
        .try_collect()
        .await?;

    tracing::info!(
        candidates = candidates.len(),
        sent = markers.len(),
        "meter markers built"
    );
    Ok(markers)
}
