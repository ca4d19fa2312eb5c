//! Data Transfer Objects for analysis results
//!
//! Reports returned to the caller (CLI or any embedding service). All of them
//! serialize to the JSON shape the dashboard consumed; failures serialize as
//! an object carrying an `error` key.

use serde::{Deserialize, Serialize};

use super::error::AnalysisError;
use crate::domain::{Listing, MarketNiche, PriceBucket, ProfileLot, SellerSummary};

// ============================================================================
// Category DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub total_lots: usize,
    pub total_sellers: usize,
    pub online_sellers: usize,
    pub price_min: f64,
    pub price_max: f64,
    pub price_avg: f64,
    pub price_median: f64,
    pub top_sellers: Vec<SellerSummary>,
    pub all_lots: Vec<Listing>,
    pub price_buckets: Vec<PriceBucket>,
    pub market_opportunities: Vec<MarketNiche>,
}

// ============================================================================
// Seller DTOs
// ============================================================================

/// Discriminator written as `"type"` on seller results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Seller,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSoldItem {
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarCount {
    pub stars: u8,
    pub count: usize,
}

/// A buyer review shown on the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSample {
    pub text: String,
    pub stars: u8,
    /// Date text as rendered by the site
    pub date: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerReport {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub name: String,
    pub user_id: u64,
    pub total_reviews: u64,
    pub rating: f64,
    pub lots_count: usize,
    pub online: bool,
    pub lots: Vec<ProfileLot>,
    pub top_sold_items: Vec<TopSoldItem>,
    pub sales_by_month: Vec<MonthCount>,
    pub rating_dist: Vec<StarCount>,
    pub review_texts: Vec<ReviewSample>,
    pub reviews_parsed: usize,
}

// ============================================================================
// Error / response envelope
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<ReportType>,
}

impl From<&AnalysisError> for ErrorBody {
    fn from(error: &AnalysisError) -> Self {
        Self {
            error: error.to_string(),
            report_type: error.is_seller_error().then_some(ReportType::Seller),
        }
    }
}

/// Outcome of [`MarketAnalyzer::analyze`](super::MarketAnalyzer::analyze);
/// callers tell success from failure by the presence of the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Category(CategoryReport),
    Seller(SellerReport),
    Error(ErrorBody),
}

impl AnalysisResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResponse::Error(_))
    }
}

impl From<Result<CategoryReport, AnalysisError>> for AnalysisResponse {
    fn from(result: Result<CategoryReport, AnalysisError>) -> Self {
        match result {
            Ok(report) => AnalysisResponse::Category(report),
            Err(e) => AnalysisResponse::Error(ErrorBody::from(&e)),
        }
    }
}

impl From<Result<SellerReport, AnalysisError>> for AnalysisResponse {
    fn from(result: Result<SellerReport, AnalysisError>) -> Self {
        match result {
            Ok(report) => AnalysisResponse::Seller(report),
            Err(e) => AnalysisResponse::Error(ErrorBody::from(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seller_error_carries_type() {
        let error = AnalysisError::InvalidSellerLink {
            target: "nope".to_string(),
        };
        let json = serde_json::to_value(AnalysisResponse::Error(ErrorBody::from(&error))).unwrap();
        assert_eq!(json["error"], "invalid seller link");
        assert_eq!(json["type"], "seller");
    }

    #[test]
    fn test_category_error_has_no_type() {
        let error = AnalysisError::NoCategoryData {
            url: "https://funpay.com/lots/1/".to_string(),
        };
        let json = serde_json::to_value(ErrorBody::from(&error)).unwrap();
        assert_eq!(json["error"], "could not retrieve data");
        assert!(json.get("type").is_none());
    }
}
