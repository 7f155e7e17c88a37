use crate::entities::contractors::Contractor;
use crate::entities::managers::PropertyManager;
use crate::entities::profiles::Profile;
use crate::repositories::postgres::PgStore;
use crate::repositories::{DirectoryRepository, StoreResult};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl DirectoryRepository for PgStore {
    async fn fetch_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        const QUERY: &str = "SELECT id, full_name, avatar_url, role FROM profiles WHERE id = $1";
        let profile = sqlx::query_as(QUERY)
            .bind(user_id)
            .fetch_optional(self.db())
            .await?;
        Ok(profile)
    }

    async fn fetch_contractor(&self, contractor_id: Uuid) -> StoreResult<Option<Contractor>> {
        const QUERY: &str = "SELECT id, user_id, company_name FROM contractors WHERE id = $1";
        let contractor = sqlx::query_as(QUERY)
            .bind(contractor_id)
            .fetch_optional(self.db())
            .await?;
        Ok(contractor)
    }

    async fn fetch_manager(&self, manager_id: Uuid) -> StoreResult<Option<PropertyManager>> {
        const QUERY: &str =
            "SELECT id, user_id, company_name FROM property_managers WHERE id = $1";
        let manager = sqlx::query_as(QUERY)
            .bind(manager_id)
            .fetch_optional(self.db())
            .await?;
        Ok(manager)
    }
}
