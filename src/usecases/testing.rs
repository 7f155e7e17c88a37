use crate::common::context::Context;
use crate::common::redis_pool::PoolResult;
use crate::entities::contractors::Contractor;
use crate::entities::profiles::Profile;
use crate::repositories::Store;
use crate::repositories::memory::MemoryStore;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct TestContext {
    pub store: MemoryStore,
}

#[async_trait]
impl Context for TestContext {
    fn store(&self) -> &dyn Store {
        &self.store
    }

    async fn redis(&self) -> Option<PoolResult> {
        None
    }
}

impl TestContext {
    pub async fn add_user(&self, name: &str, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .add_profile(Profile {
                id,
                full_name: Some(name.to_string()),
                avatar_url: Some(format!("https://cdn.example.com/{id}.png")),
                role: role.to_string(),
            })
            .await;
        id
    }

    pub async fn add_contractor(&self, company_name: &str, user_id: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .add_contractor(Contractor {
                id,
                user_id,
                company_name: company_name.to_string(),
            })
            .await;
        id
    }
}
