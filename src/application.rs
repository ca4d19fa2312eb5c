//! Application layer module
//!
//! This module contains the analysis use cases and the data transfer objects
//! they return, orchestrating fetching, parsing and aggregation.

pub mod analysis_service;
pub mod category_analysis;
pub mod dto;
pub mod error;
pub mod paginator;
pub mod seller_analysis;

// Re-export main types for easier access
pub use analysis_service::MarketAnalyzer;
pub use dto::{
    AnalysisResponse, CategoryReport, ErrorBody, MonthCount, ReportType, ReviewSample,
    SellerReport, StarCount, TopSoldItem,
};
pub use error::{AnalysisError, AnalysisResult};
pub use paginator::Paginator;
