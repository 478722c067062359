use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Port the delivery service listens on in every environment
const DELIVERY_PORT: u16 = 5000;

/// Deployment environment, used to pick the delivery service host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    #[default]
    Local,
    Docker,
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Apply the embedded migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,

    #[serde(default)]
    pub app_env: AppEnv,

    /// Delivery service host when running under docker compose
    #[serde(default = "default_delivery_container_host")]
    pub delivery_container_host: String,

    /// Explicit delivery service base URL, wins over `app_env`
    pub delivery_base_url: Option<String>,

    /// Timeout for outbound delivery calls. Unset means wait indefinitely.
    pub delivery_timeout_secs: Option<u64>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5001".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_delivery_container_host() -> String {
    "componente-a".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Build a configuration from explicit key/value pairs, using the same
    /// names as the environment (`DATABASE_URL`, `APP_ENV`, ...)
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(pairs)?)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Base URL of the delivery service, without a trailing slash
    pub fn delivery_base_url(&self) -> String {
        if let Some(url) = &self.delivery_base_url {
            return url.trim_end_matches('/').to_string();
        }

        match self.app_env {
            AppEnv::Local => format!("http://localhost:{}", DELIVERY_PORT),
            AppEnv::Docker => format!("http://{}:{}", self.delivery_container_host, DELIVERY_PORT),
        }
    }

    pub fn delivery_timeout(&self) -> Option<Duration> {
        self.delivery_timeout_secs.map(Duration::from_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    tracing::debug!(
        bind_addr = %config.bind_addr,
        app_env = ?config.app_env,
        delivery = %config.delivery_base_url(),
        "configuration loaded"
    );

    Ok(config)
}
