/// Installation point anchoring one or more meters.
///
/// Zone and district membership are optional; coordinates may be missing for
/// sites that were never surveyed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfrastructureSite {
    #[sqlx(rename = "infraestructura_id")]
    pub infrastructure_id: String,
    #[sqlx(rename = "latitud")]
    pub latitude: Option<f64>,
    #[sqlx(rename = "longitud")]
    pub longitude: Option<f64>,
    #[sqlx(rename = "zona_id")]
    pub zone_id: Option<String>,
    #[sqlx(rename = "distrito_id")]
    pub district_id: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Zone {
    #[sqlx(rename = "zona_id")]
    pub zone_id: String,
    #[sqlx(rename = "nombre")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct District {
    #[sqlx(rename = "distrito_id")]
    pub district_id: String,
    #[sqlx(rename = "nombre")]
    pub name: Option<String>,
    #[sqlx(rename = "habitantes")]
    pub inhabitants: Option<i64>,
}
