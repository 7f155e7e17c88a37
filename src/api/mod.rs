use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::redis_pool::{PoolResult, RedisPool};
use crate::common::state::AppState;
use crate::common::viewer::get_data_source_override;
use crate::repositories::Store;
use crate::settings::{AppSettings, DataSource};
use async_trait::async_trait;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub mod v1;

/// Per-request view of the application state, with the data source
/// already resolved.
#[derive(Clone)]
pub struct RequestContext {
    pub store: Arc<dyn Store>,
    pub redis: Option<RedisPool>,
    pub data_source: DataSource,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/api/v1", v1::router())
}

pub async fn index() -> &'static str {
    "Running tradeboard-messaging v0.1"
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = crate::common::init::initialize_state(settings).await?;
    let app = router().with_state(state);
    let addr = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, data_source = settings.data_source.as_str(), "Serving messaging api");
    axum::serve(listener, app).await?;
    Ok(())
}

impl RequestContext {
    pub fn new(state: &AppState, explicit: Option<DataSource>) -> Result<Self, AppError> {
        let data_source = DataSource::resolve(explicit, state.default_data_source);
        Ok(Self {
            store: state.store_for(data_source)?,
            redis: state.redis.clone(),
            data_source,
        })
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let explicit = get_data_source_override(parts)?;
        RequestContext::new(state, explicit)
    }
}

#[async_trait]
impl Context for RequestContext {
    fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    async fn redis(&self) -> Option<PoolResult> {
        match &self.redis {
            Some(redis) => Some(redis.get().await),
            None => None,
        }
    }
}
