use sqlx::FromRow;
use uuid::Uuid;

/// A contractor company. `user_id` is the account that represents the company
/// and is `None` for companies nobody has claimed yet.
#[derive(Debug, Clone, FromRow)]
pub struct Contractor {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub company_name: String,
}
