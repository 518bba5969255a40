//! Configuration infrastructure
//!
//! Loads `AppConfig` from an optional JSON file in the user config directory,
//! layered with `LISTING_HARVESTER_*` environment variables. Every section
//! falls back to its defaults, so a partial file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::domain::variant::{ListingCategory, TransportErrorPolicy};
pub use crate::infrastructure::parsing::config::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub crawling: CrawlingConfig,
    pub http: HttpConfig,
    pub export: ExportConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// One fixed query parameter appended to every search URL of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Search location of one listing category on the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySite {
    /// Path below `base_url`, with a trailing slash
    pub path: String,

    /// Whether the lowercased brand is appended as a path segment
    pub brand_in_path: bool,

    pub fixed_params: Vec<QueryParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site origin, also used to resolve relative ad links
    pub base_url: String,
    pub bike: CategorySite,
    pub car: CategorySite,
    pub motorcycle: CategorySite,
}

impl SiteConfig {
    pub const fn category(&self, category: ListingCategory) -> &CategorySite {
        match category {
            ListingCategory::Bike => &self.bike,
            ListingCategory::Car => &self.car,
            ListingCategory::Motorcycle => &self.motorcycle,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: olx::BASE_URL.to_string(),
            bike: CategorySite {
                path: olx::BIKE_PATH.to_string(),
                brand_in_path: false,
                fixed_params: vec![QueryParam::new(olx::params::BIKE_TYPE, olx::params::BIKE_TYPE_MTB)],
            },
            car: CategorySite {
                path: olx::CAR_PATH.to_string(),
                brand_in_path: true,
                fixed_params: vec![QueryParam::new(olx::params::ORDER, olx::params::ORDER_PRICE_ASC)],
            },
            motorcycle: CategorySite {
                path: olx::MOTORCYCLE_PATH.to_string(),
                brand_in_path: true,
                fixed_params: vec![QueryParam::new(olx::params::ORDER, olx::params::ORDER_PRICE_ASC)],
            },
        }
    }
}

/// Crawl pacing and policy overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlingConfig {
    /// Sleep after every fetch, in milliseconds
    pub request_delay_ms: u64,

    /// Detail pages fetched at once; 1 means strictly sequential
    pub detail_concurrency: usize,

    /// Overrides the per-category transport policy when set
    pub transport_error_policy: Option<TransportErrorPolicy>,

    /// Upper bound accepted by the page-count prompt
    pub max_requested_pages: u32,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            detail_concurrency: defaults::DETAIL_CONCURRENCY,
            transport_error_policy: None,
            max_requested_pages: defaults::MAX_REQUESTED_PAGES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
            max_redirects: defaults::MAX_REDIRECTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving `<stem>.csv` / `<stem>.json`
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console (stderr) output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    pub file_name: String,

    /// Log directory; `<exe dir>/logs` when unset
    pub directory: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let module_filters = [
            ("reqwest", "warn"),
            ("hyper", "warn"),
            ("hyper_util", "warn"),
            ("html5ever", "error"),
            ("selectors", "error"),
        ]
        .into_iter()
        .map(|(module, level)| (module.to_string(), level.to_string()))
        .collect();

        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            directory: None,
            module_filters,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Write the default file on first run, then load with env overrides
    pub async fn initialize_on_first_run(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("First run detected - writing default configuration");
            self.save_config(&AppConfig::default()).await?;
        }

        self.load_config()
    }

    /// Load the file (if present) layered with `LISTING_HARVESTER_*` variables
    pub fn load_config(&self) -> Result<AppConfig> {
        let environment = config::Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        let config = load_from_sources(&self.config_path, environment)?;
        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Build an `AppConfig` from an optional JSON file and an environment source
pub fn load_from_sources(path: &Path, environment: config::Environment) -> Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Json)
                .required(false),
        )
        .add_source(environment)
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    settings
        .try_deserialize::<AppConfig>()
        .context("Configuration has invalid values")
}

/// olx.pt site layout
pub mod olx {
    pub const BASE_URL: &str = "https://www.olx.pt";

    pub const BIKE_PATH: &str = "desporto-e-lazer/bicicletas/";
    pub const CAR_PATH: &str = "carros-motos-e-barcos/carros/";
    pub const MOTORCYCLE_PATH: &str = "carros-motos-e-barcos/motociclos-scooters/";

    /// Query parameter names
    pub mod params {
        pub const PAGE: &str = "page";
        pub const ORDER: &str = "search[order]";
        pub const ORDER_PRICE_ASC: &str = "filter_float_price:asc";
        pub const BIKE_TYPE: &str = "search[filter_enum_tipo][0]";
        /// Mountain bikes
        pub const BIKE_TYPE_MTB: &str = "btt";
        pub const MODEL: &str = "search[filter_enum_modelo][0]";
        pub const YEAR_FROM: &str = "search[filter_float_year:from]";
        pub const YEAR_TO: &str = "search[filter_float_year:to]";
        pub const PRICE_FROM: &str = "search[filter_float_price:from]";
        pub const PRICE_TO: &str = "search[filter_float_price:to]";
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "listing-harvester";
    pub const CONFIG_FILE_NAME: &str = "config.json";
    pub const ENV_PREFIX: &str = "LISTING_HARVESTER";

    pub const REQUEST_DELAY_MS: u64 = 0;
    pub const DETAIL_CONCURRENCY: usize = 1;
    pub const MAX_REQUESTED_PAGES: u32 = 25;

    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const MAX_REDIRECTS: usize = 10;

    pub const OUTPUT_DIR: &str = ".";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_FILE_NAME: &str = "listing-harvester.log";
}

/// URL helpers
pub mod utils {
    use url::Url;

    /// Resolve an `href` against `base` with standard URL join semantics
    pub fn resolve_url(href: &str, base: &str) -> Result<String, url::ParseError> {
        Ok(Url::parse(base)?.join(href.trim())?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();

        config::Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_from_sources(&dir.path().join("absent.json"), env_with(&[])).unwrap();

        assert_eq!(config.site.base_url, olx::BASE_URL);
        assert_eq!(config.crawling.detail_concurrency, 1);
        assert_eq!(config.crawling.request_delay_ms, 0);
        assert!(config.crawling.transport_error_policy.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "crawling": { "request_delay_ms": 250, "transport_error_policy": "skip_page" } }"#)
            .unwrap();

        let config = load_from_sources(&path, env_with(&[])).unwrap();
        assert_eq!(config.crawling.request_delay_ms, 250);
        assert_eq!(config.crawling.transport_error_policy, Some(TransportErrorPolicy::SkipPage));
        assert_eq!(config.crawling.max_requested_pages, defaults::MAX_REQUESTED_PAGES);
        assert_eq!(config.http.timeout_seconds, defaults::REQUEST_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "crawling": { "request_delay_ms": 250 } }"#).unwrap();

        let config = load_from_sources(
            &path,
            env_with(&[
                ("LISTING_HARVESTER_CRAWLING__REQUEST_DELAY_MS", "500"),
                ("LISTING_HARVESTER_EXPORT__OUTPUT_DIR", "/tmp/out"),
            ]),
        )
        .unwrap();

        assert_eq!(config.crawling.request_delay_ms, 500);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/out"));
    }

    #[tokio::test]
    async fn test_first_run_writes_default_file() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let config = manager.initialize_on_first_run().await.unwrap();
        assert!(manager.config_path().exists());
        assert_eq!(config.site.car.path, olx::CAR_PATH);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            utils::resolve_url("/d/anuncio/bike-IDabc.html", olx::BASE_URL).unwrap(),
            "https://www.olx.pt/d/anuncio/bike-IDabc.html"
        );
        assert_eq!(
            utils::resolve_url("https://www.standvirtual.com/x", olx::BASE_URL).unwrap(),
            "https://www.standvirtual.com/x"
        );
        assert!(utils::resolve_url("/x", "not a url").is_err());
    }
}
