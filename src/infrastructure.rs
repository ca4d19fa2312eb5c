//! Infrastructure layer for fetching, parsing, configuration and logging
//!
//! This module provides the HTTP fetcher, the HTML field extractors, the
//! layered configuration and the tracing setup used by the analysis pipeline.

pub mod config; // Layered configuration (file + environment)
pub mod http_client; // Polite, retrying page fetcher
pub mod logging; // Logging infrastructure
pub mod parsing; // Selector chains, page parsers and normalization
pub mod parsing_error; // Parser construction errors

// Re-export commonly used items
pub use config::{AnalystConfig, ConfigError, HttpSettings, LoggingConfig};
pub use http_client::{FetchContext, FetchError, FetchResult, HttpClient, PageSource, RetryPolicy};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    ContextualParser, MarketParsers, ParseContext, ParsingError, ParsingResult, SelectorConfig,
};
