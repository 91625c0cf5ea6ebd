use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

pub const DEFAULT_ACTOR_ID: &str = "clockworks~free-tiktok-scraper";
pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub apify: ApifySettings,
    #[serde(default)]
    pub scraper: ScraperSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApifySettings {
    pub token: String,
    #[serde(default = "default_actor_id")]
    pub actor_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for a single HTTP request to the service.
    #[serde(
        default = "default_request_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub request_timeout_secs: u64,
}

impl ApifySettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// The token never shows up in logs.
impl std::fmt::Debug for ApifySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifySettings")
            .field("token", &"[redacted]")
            .field("actor_id", &self.actor_id)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScraperSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub results_per_page: u32,
    pub proxy_country_code: String,
    /// Local polling budget. Independent of the actor's own `TIMED-OUT` status.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_poll_attempts: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub dataset_page_size: usize,
    /// Overrides the compiled-in target list when set.
    pub post_urls: Option<Vec<String>>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        ScraperSettings {
            results_per_page: 100,
            proxy_country_code: "ID".to_string(),
            max_poll_attempts: 12,
            poll_interval_secs: 5,
            dataset_page_size: 1000,
            post_urls: None,
        }
    }
}

impl ScraperSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputSettings {
    pub path: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            path: PathBuf::from("output/tiktok_metrics.xlsx"),
        }
    }
}

fn default_actor_id() -> String {
    DEFAULT_ACTOR_ID.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("failed to determine the current directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("apify token is empty; set APIFY_TOKEN or APP_APIFY__TOKEN")]
    EmptyToken,
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir()?;
    get_configuration_from(&base_path)
}

/// Loads `<base_path>/.env` into the environment (existing variables win),
/// then reads `<base_path>/configuration/base.*` and the environment.
pub fn get_configuration_from(base_path: &Path) -> Result<Settings, ConfigurationError> {
    if dotenv::from_path(base_path.join(".env")).is_ok() {
        log::info!("Loaded environment from {}", base_path.join(".env").display());
    }
    let configuration_directory = base_path.join("configuration");

    let builder = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("apify.token", std::env::var("APIFY_TOKEN").ok())?;

    build_settings(builder)
}

/// Deserializes and validates settings from an already assembled builder.
pub fn build_settings(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Settings, ConfigurationError> {
    let settings: Settings = builder.build()?.try_deserialize()?;

    if settings.apify.token.trim().is_empty() {
        return Err(ConfigurationError::EmptyToken);
    }

    Ok(settings)
}
