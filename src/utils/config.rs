use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use easy_config_store::ConfigStore;
use eyre::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub type Config = Arc<ConfigInner>;

pub const SUPERJOB_KEY_ENV: &str = "SUPERJOB_API_KEY";

pub fn config(path: PathBuf) -> Result<Config> {
    let config_store = ConfigStore::<ConfigInner>::read(path, "config".to_string())?;
    let mut inner = (*config_store).clone();

    if inner.superjob.api_key.as_deref().is_none_or(str::is_empty)
        && let Ok(key) = std::env::var(SUPERJOB_KEY_ENV)
    {
        debug!("using superjob api key from {}", SUPERJOB_KEY_ENV);
        inner.superjob.api_key = Some(key);
    }

    info!("config parsing successful");
    debug!("loaded configuration:\n{}", toml::to_string_pretty(&inner)?);

    Ok(Arc::new(inner))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigInner {
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub headhunter: ProviderConfig,
    pub superjob: ProviderConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl HttpConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Endpoints and paging limits of a single vacancy service.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    pub areas_url: String,
    pub vacancies_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub max_pages: u32,
    pub wrap_width: usize,
    pub api_key: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_user_agent() -> String {
    format!("vacancy-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_delay_ms() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

impl Default for ConfigInner {
    fn default() -> Self {
        let cfg = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.default.toml",));

        toml::from_str(cfg).unwrap() // should be okay
    }
}
