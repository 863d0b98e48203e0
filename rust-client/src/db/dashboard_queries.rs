use anyhow::Result;
use sqlx::PgPool;

use crate::domain::{District, InfrastructureSite, Meter, MeterError, MeterReading, Receipt, User, Zone};

/// Fetch up to `limit` receipts. The store does not guarantee any order.
pub async fn recent_receipts(pool: &PgPool, limit: i64) -> Result<Vec<Receipt>> {
    let rows = sqlx::query_as::<_, Receipt>(
        r#"
        SELECT
            recibo_id,
            usuario_id,
            medidor_id,
            consumo_m3,
            fecha_emision
        FROM recibos
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn users(pool: &PgPool, limit: i64) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>("SELECT usuario_id, nombre FROM usuarios LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn all_users(pool: &PgPool) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>("SELECT usuario_id, nombre FROM usuarios")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Infrastructure site a meter is installed on, if the meter exists and has one.
pub async fn meter_infrastructure(pool: &PgPool, meter_id: &str) -> Result<Option<String>> {
    let row = sqlx::query_scalar::<_, Option<String>>(
        "SELECT infraestructura_id FROM medidores WHERE medidor_id = $1 LIMIT 1",
    )
    .bind(meter_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.flatten())
}

pub async fn infrastructure_zone(pool: &PgPool, infrastructure_id: &str) -> Result<Option<String>> {
    let row = sqlx::query_scalar::<_, Option<String>>(
        "SELECT zona_id FROM infraestructuras WHERE infraestructura_id = $1 LIMIT 1",
    )
    .bind(infrastructure_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.flatten())
}

pub async fn zone_name(pool: &PgPool, zone_id: &str) -> Result<Option<String>> {
    let row = sqlx::query_scalar::<_, Option<String>>("SELECT nombre FROM zonas WHERE zona_id = $1 LIMIT 1")
        .bind(zone_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.flatten())
}

pub async fn all_meters(pool: &PgPool) -> Result<Vec<Meter>> {
    let rows = sqlx::query_as::<_, Meter>(
        r#"
        SELECT
            medidor_id,
            usuario_id,
            infraestructura_id,
            modelo,
            estado
        FROM medidores
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn meters_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Meter>> {
    let rows = sqlx::query_as::<_, Meter>(
        r#"
        SELECT
            medidor_id,
            usuario_id,
            infraestructura_id,
            modelo,
            estado
        FROM medidores
        WHERE usuario_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_meters_with_status(pool: &PgPool, status: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM medidores WHERE estado = $1")
        .bind(status)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn unresolved_meter_errors(pool: &PgPool) -> Result<Vec<MeterError>> {
    let rows = sqlx::query_as::<_, MeterError>(
        "SELECT medidor_id, resuelto FROM errores_medidor WHERE resuelto = false",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn all_infrastructures(pool: &PgPool) -> Result<Vec<InfrastructureSite>> {
    let rows = sqlx::query_as::<_, InfrastructureSite>(
        r#"
        SELECT
            infraestructura_id,
            latitud,
            longitud,
            zona_id,
            distrito_id
        FROM infraestructuras
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn all_zones(pool: &PgPool) -> Result<Vec<Zone>> {
    let rows = sqlx::query_as::<_, Zone>("SELECT zona_id, nombre FROM zonas")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn all_districts(pool: &PgPool) -> Result<Vec<District>> {
    let rows = sqlx::query_as::<_, District>("SELECT distrito_id, nombre, habitantes FROM distritos")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Most recent flow readings for one meter, newest first.
pub async fn latest_readings(pool: &PgPool, meter_id: &str, limit: i64) -> Result<Vec<MeterReading>> {
    let rows = sqlx::query_as::<_, MeterReading>(
        r#"
        SELECT
            medidor_id,
            fecha_hora,
            caudal_lts_seg
        FROM lecturas_medidor
        WHERE medidor_id = $1
        ORDER BY fecha_hora DESC
        LIMIT $2
        "#,
    )
    .bind(meter_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
