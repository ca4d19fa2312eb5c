//! FunPay Analyst - marketplace extraction and analytics pipeline
//!
//! Fetches paginated marketplace pages, extracts listings, seller profiles
//! and reviews through ordered selector fallbacks, and aggregates them into
//! seller rankings, price histograms, market niches and review timelines.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

/// In-memory page source and markup builders for tests
pub mod test_utils;

// Re-export the entry points for easier access
pub use application::{AnalysisResponse, CategoryReport, MarketAnalyzer, SellerReport};
pub use domain::Currency;
pub use infrastructure::{AnalystConfig, HttpClient, PageSource};
