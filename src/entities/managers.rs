use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PropertyManager {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub company_name: String,
}
