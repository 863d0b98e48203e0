#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    #[sqlx(rename = "usuario_id")]
    pub user_id: String,
    #[sqlx(rename = "nombre")]
    pub name: Option<String>,
}
