use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use super::{error::ApiError, state::AppState};
use crate::{
    aggregate::{
        customers::{self, CustomerRow},
        meter_map::{self, MeterMarker},
        monthly::{self, MonthlyTotal},
        per_capita::{self, PerCapitaConsumption},
        stats::{self, CityStats},
        zones::{self, ZoneConsumption},
    },
    receipt::{self, ReceiptNotice},
};

/// Rows listed by `/api/usuarios`.
pub const USER_SAMPLE: i64 = 10;

/// Projection of a `usuarios` row onto the columns the service reads.
///
/// The store's remaining user columns are not part of this API.
#[derive(Debug, Serialize)]
pub struct UserRecord {
    pub usuario_id: String,
    pub nombre: Option<String>,
}

pub async fn users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    let users = state.run("usuarios", state.store.users(USER_SAMPLE)).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserRecord {
                usuario_id: u.user_id,
                nombre: u.name,
            })
            .collect(),
    ))
}

pub async fn top_zones(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ZoneConsumption>>, ApiError> {
    let concurrency = state.settings.meter_map.lookup_concurrency;
    state
        .run("topzonas", zones::top_zones(state.store.as_ref(), concurrency))
        .await
        .map(Json)
}

pub async fn average_consumption(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PerCapitaConsumption>, ApiError> {
    state
        .run("consumo-promedio", per_capita::average_per_capita(state.store.as_ref()))
        .await
        .map(Json)
}

pub async fn monthly_consumption(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    let offset = state.settings.reporting_offset;
    state
        .run("consumo-mensual", monthly::monthly_consumption(state.store.as_ref(), offset))
        .await
        .map(Json)
}

pub async fn city_stats(State(state): State<Arc<AppState>>) -> Result<Json<CityStats>, ApiError> {
    state
        .run("estadisticas", stats::city_stats(state.store.as_ref()))
        .await
        .map(Json)
}

pub async fn customers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CustomerRow>>, ApiError> {
    state
        .run("clientes", customers::customer_listing(state.store.as_ref()))
        .await
        .map(Json)
}

pub async fn meter_positions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MeterMarker>>, ApiError> {
    let settings = &state.settings;
    state
        .run(
            "medidores-posicion",
            meter_map::meter_markers(state.store.as_ref(), &settings.meter_map, settings.reporting_offset),
        )
        .await
        .map(Json)
}

pub async fn receipt_notices(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ReceiptNotice>>, ApiError> {
    let settings = &state.settings;
    let markers = state
        .run(
            "recibos-aviso",
            meter_map::meter_markers(state.store.as_ref(), &settings.meter_map, settings.reporting_offset),
        )
        .await?;
    Ok(Json(receipt::notices(&markers, &settings.tariff)))
}
