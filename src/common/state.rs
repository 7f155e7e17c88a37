use crate::common::error::{AppError, ServiceResult};
use crate::common::redis_pool::RedisPool;
use crate::repositories::Store;
use crate::repositories::memory::MemoryStore;
use crate::repositories::postgres::PgStore;
use crate::settings::DataSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub live: Option<PgStore>,
    pub mock: MemoryStore,
    pub redis: Option<RedisPool>,
    pub default_data_source: DataSource,
}

impl AppState {
    pub fn store_for(&self, data_source: DataSource) -> ServiceResult<Arc<dyn Store>> {
        match data_source {
            DataSource::Mock => Ok(Arc::new(self.mock.clone())),
            DataSource::Live => match &self.live {
                Some(store) => Ok(Arc::new(store.clone())),
                None => Err(AppError::DataSourceUnavailable),
            },
        }
    }
}
