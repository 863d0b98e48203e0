use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Meter {
    #[sqlx(rename = "medidor_id")]
    pub meter_id: String,
    #[sqlx(rename = "usuario_id")]
    pub user_id: Option<String>,
    #[sqlx(rename = "infraestructura_id")]
    pub infrastructure_id: Option<String>,
    #[sqlx(rename = "modelo")]
    pub model: Option<String>,
    /// `activo` / `inactivo` as stored.
    #[sqlx(rename = "estado")]
    pub status: Option<String>,
}

/// Instantaneous flow sample from `lecturas_medidor`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeterReading {
    #[sqlx(rename = "medidor_id")]
    pub meter_id: String,
    #[sqlx(rename = "fecha_hora")]
    pub ts: OffsetDateTime,
    #[sqlx(rename = "caudal_lts_seg")]
    pub flow_lps: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeterError {
    #[sqlx(rename = "medidor_id")]
    pub meter_id: String,
    #[sqlx(rename = "resuelto")]
    pub resolved: bool,
}
