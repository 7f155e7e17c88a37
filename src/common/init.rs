use crate::common::redis_pool::{RedisPool, RedisPoolManager};
use crate::common::state::AppState;
use crate::repositories::memory::MemoryStore;
use crate::repositories::postgres::PgStore;
use crate::settings::{AppSettings, DataSource};
use deadpool::Runtime;
use redis::{AsyncConnectionConfig, Commands};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let live = match &settings.database_url {
        Some(database_url) => Some(PgStore::new(initialize_db(settings, database_url).await?)),
        None => None,
    };
    let mock = MemoryStore::with_demo_data().await;
    let redis = match &settings.redis_url {
        Some(redis_url) => Some(initialize_redis(settings, redis_url)?),
        None => {
            info!("REDIS_URL not set, live message events are disabled");
            None
        }
    };
    if settings.data_source == DataSource::Mock {
        info!("Serving mock data unless a request asks for live data");
    }
    Ok(AppState {
        live,
        mock,
        redis,
        default_data_source: settings.data_source,
    })
}

pub async fn initialize_db(
    settings: &AppSettings,
    database_url: &str,
) -> sqlx::Result<Pool<Postgres>> {
    PgPoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections as _)
        .connect(database_url)
        .await
}

pub fn initialize_redis(settings: &AppSettings, redis_url: &str) -> anyhow::Result<RedisPool> {
    let redis_client = redis::Client::open(redis_url)?;
    let mut conn = redis_client.get_connection_with_timeout(settings.redis_wait_timeout)?;
    let _: () = conn.ping()?;
    let redis_cfg = AsyncConnectionConfig::new()
        .set_connection_timeout(settings.redis_connection_timeout)
        .set_response_timeout(settings.redis_response_timeout);

    let redis_manager = RedisPoolManager::new(redis_client, redis_cfg);
    let redis = RedisPool::builder(redis_manager)
        .max_size(settings.redis_max_connections)
        .wait_timeout(Some(settings.redis_wait_timeout))
        .runtime(Runtime::Tokio1)
        .build()?;
    Ok(redis)
}
