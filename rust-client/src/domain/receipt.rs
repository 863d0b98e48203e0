use time::OffsetDateTime;

/// One billing record from `recibos`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Receipt {
    #[sqlx(rename = "recibo_id")]
    pub receipt_id: Option<String>,
    #[sqlx(rename = "usuario_id")]
    pub user_id: Option<String>,
    #[sqlx(rename = "medidor_id")]
    pub meter_id: Option<String>,
    #[sqlx(rename = "consumo_m3")]
    pub consumption_m3: Option<f64>,
    #[sqlx(rename = "fecha_emision")]
    pub issued_at: Option<OffsetDateTime>,
}
