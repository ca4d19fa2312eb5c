//! Configuration infrastructure
//!
//! Contains configuration loading and validation for the analysis pipeline.
//!
//! Configuration is organized into four groups:
//! 1. HTTP fetching (headers, timeout, retry and politeness policy)
//! 2. Pagination limits
//! 3. Aggregation knobs (histogram width, top-N caps)
//! 4. Logging
//!
//! Values come from compiled-in defaults, optionally overlaid by a config
//! file and by `FUNPAY_ANALYST__*` environment variables.

#![allow(clippy::derivable_impls)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from file: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystConfig {
    pub http: HttpSettings,
    pub pagination: PaginationSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingConfig,
}

/// HTTP fetching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Site root used to resolve relative links
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
    /// Name of the currency-selection cookie
    pub currency_cookie: String,
    /// Per-request socket timeout in seconds
    pub timeout_seconds: u64,
    /// Attempts per page before the fetch is given up
    pub max_attempts: u32,
    /// Fixed pause after a failed attempt
    pub retry_pause_ms: u64,
    /// Randomized politeness delay applied before every attempt
    pub politeness_min_ms: u64,
    pub politeness_max_ms: u64,
}

/// Pagination limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Maximum category pages fetched per analysis
    pub category_max_pages: u32,
    /// Review nodes per profile page (`skip` increment)
    pub review_page_size: usize,
    pub default_max_reviews: usize,
    pub max_reviews_cap: usize,
}

/// Aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub histogram_buckets: usize,
    pub niche_count: usize,
    pub top_sellers_limit: usize,
    pub top_items_limit: usize,
    pub review_text_limit: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs (file output)
    pub json_format: bool,

    /// Enable console output (stderr, stdout is reserved for reports)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            http: HttpSettings::default(),
            pagination: PaginationSettings::default(),
            analysis: AnalysisSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            accept: defaults::ACCEPT.to_string(),
            currency_cookie: defaults::CURRENCY_COOKIE.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_attempts: defaults::MAX_ATTEMPTS,
            retry_pause_ms: defaults::RETRY_PAUSE_MS,
            politeness_min_ms: defaults::POLITENESS_MIN_MS,
            politeness_max_ms: defaults::POLITENESS_MAX_MS,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            category_max_pages: defaults::CATEGORY_MAX_PAGES,
            review_page_size: defaults::REVIEW_PAGE_SIZE,
            default_max_reviews: defaults::DEFAULT_MAX_REVIEWS,
            max_reviews_cap: defaults::MAX_REVIEWS_CAP,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            histogram_buckets: defaults::HISTOGRAM_BUCKETS,
            niche_count: defaults::NICHE_COUNT,
            top_sellers_limit: defaults::TOP_SELLERS_LIMIT,
            top_items_limit: defaults::TOP_ITEMS_LIMIT,
            review_text_limit: defaults::REVIEW_TEXT_LIMIT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "warn".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "error".to_string());
                filters.insert("selectors".to_string(), "error".to_string());
                filters
            },
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }
}

impl PaginationSettings {
    /// Clamp a requested review cap into `[1, max_reviews_cap]`
    pub fn clamp_max_reviews(&self, requested: i64) -> usize {
        let cap = self.max_reviews_cap.max(1) as i64;
        requested.clamp(1, cap) as usize
    }
}

impl AnalystConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        } else if let Ok(default_path) = Self::default_config_path() {
            builder = builder.add_source(config::File::from(default_path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Configuration loaded (base_url={})", config.http.base_url);
        Ok(config)
    }

    /// Default location of the config file
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or_else(|| ConfigError::Validation {
            message: "no user config directory on this platform".to_string(),
        })?;
        Ok(dir.join("funpay-analyst").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.politeness_min_ms > self.http.politeness_max_ms {
            return Err(ConfigError::Validation {
                message: "politeness_min_ms cannot be greater than politeness_max_ms".to_string(),
            });
        }
        if self.http.max_attempts == 0 {
            return Err(ConfigError::Validation {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }
        if self.pagination.review_page_size == 0 {
            return Err(ConfigError::Validation {
                message: "review_page_size must be greater than 0".to_string(),
            });
        }
        if self.analysis.histogram_buckets == 0 {
            return Err(ConfigError::Validation {
                message: "histogram_buckets must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    pub const ENV_PREFIX: &str = "FUNPAY_ANALYST";

    /// Marketplace root
    pub const BASE_URL: &str = "https://funpay.com";

    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    pub const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en;q=0.8";
    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
    pub const CURRENCY_COOKIE: &str = "cy";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const RETRY_PAUSE_MS: u64 = 3000;
    pub const POLITENESS_MIN_MS: u64 = 800;
    pub const POLITENESS_MAX_MS: u64 = 2000;

    pub const CATEGORY_MAX_PAGES: u32 = 2;
    pub const REVIEW_PAGE_SIZE: usize = crate::domain::pagination::REVIEW_PAGE_SIZE;
    pub const DEFAULT_MAX_REVIEWS: usize = 200;
    pub const MAX_REVIEWS_CAP: usize = 1000;

    pub const HISTOGRAM_BUCKETS: usize = 8;
    pub const NICHE_COUNT: usize = 3;
    pub const TOP_SELLERS_LIMIT: usize = 20;
    pub const TOP_ITEMS_LIMIT: usize = 10;
    pub const REVIEW_TEXT_LIMIT: usize = 20;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "funpay-analyst.log";
}
