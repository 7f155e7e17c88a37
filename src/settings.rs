use crate::common::env::FromEnv;
use std::env;
use std::fmt;
use std::net::IpAddr;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

/// Where conversation data is read from and written to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    #[default]
    Live,
    Mock,
}

#[derive(Debug)]
pub struct InvalidDataSource(String);

impl fmt::Display for InvalidDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid data source `{}` (expected `live` or `mock`)", self.0)
    }
}

impl std::error::Error for InvalidDataSource {}

impl FromStr for DataSource {
    type Err = InvalidDataSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "real" => Ok(DataSource::Live),
            "mock" | "demo" => Ok(DataSource::Mock),
            other => Err(InvalidDataSource(other.to_string())),
        }
    }
}

impl DataSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Mock => "mock",
        }
    }

    /// An explicit override always wins over the configured default.
    pub fn resolve(explicit: Option<DataSource>, default: DataSource) -> DataSource {
        explicit.unwrap_or(default)
    }
}

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub data_source: DataSource,
    pub frontend_base_url: String,

    pub database_url: Option<String>,
    pub db_max_connections: usize,
    pub db_wait_timeout: Duration,

    pub redis_url: Option<String>,
    pub redis_max_connections: usize,
    pub redis_connection_timeout: Duration,
    pub redis_response_timeout: Duration,
    pub redis_wait_timeout: Duration,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT").unwrap_or_else(|_| "api".to_string());
        let level = Level::from_env_or("LOG_LEVEL", Level::INFO)?;
        let app_host = IpAddr::from_env("APP_HOST")?;
        let app_port = u16::from_env("APP_PORT")?;

        let data_source = DataSource::from_env_or("DATA_SOURCE", DataSource::Live)?;
        let frontend_base_url = env::var("FRONTEND_BASE_URL").unwrap_or_default();

        let database_url = String::from_env_opt("DATABASE_URL")?;
        if data_source == DataSource::Live && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when DATA_SOURCE is `live`");
        }
        let db_max_connections = usize::from_env_or("DB_MAX_CONNECTIONS", 10)?;
        let db_wait_timeout_secs = u64::from_env_or("DB_WAIT_TIMEOUT_SECS", 5)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        let redis_url = String::from_env_opt("REDIS_URL")?;
        let redis_max_connections = usize::from_env_or("REDIS_MAX_CONNECTIONS", 8)?;
        let redis_connection_timeout_secs = u64::from_env_or("REDIS_CONNECTION_TIMEOUT_SECS", 5)?;
        let redis_connection_timeout = Duration::from_secs(redis_connection_timeout_secs);
        let redis_response_timeout_secs = u64::from_env_or("REDIS_RESPONSE_TIMEOUT_SECS", 5)?;
        let redis_response_timeout = Duration::from_secs(redis_response_timeout_secs);
        let redis_wait_timeout_secs = u64::from_env_or("REDIS_WAIT_TIMEOUT_SECS", 5)?;
        let redis_wait_timeout = Duration::from_secs(redis_wait_timeout_secs);

        Ok(AppSettings {
            app_component,
            level,
            app_port,
            app_host,

            data_source,
            frontend_base_url,

            database_url,
            db_max_connections,
            db_wait_timeout,

            redis_url,
            redis_max_connections,
            redis_connection_timeout,
            redis_response_timeout,
            redis_wait_timeout,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
