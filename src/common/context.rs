use crate::common::redis_pool::PoolResult;
use crate::repositories::Store;
use async_trait::async_trait;

#[async_trait]
pub trait Context: Sync + Send {
    fn store(&self) -> &dyn Store;

    /// `None` when no Redis instance is configured.
    async fn redis(&self) -> Option<PoolResult>;
}
