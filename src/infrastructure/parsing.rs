//! HTML parsing infrastructure for marketplace pages
//!
//! This module provides the field extractors used by the pipeline. Every field
//! is located through an ordered [`SelectorChain`] (first matching candidate
//! wins) and normalized by the pure functions in [`normalize`]. Extraction
//! never fails: a field nobody matched takes its default value.

pub mod catalog_parser;
pub mod config;
pub mod context;
pub mod error;
pub mod listing_parser;
pub mod normalize;
pub mod profile_parser;
pub mod review_parser;
pub mod selector_chain;

// Re-export public types
pub use catalog_parser::CatalogParser;
pub use config::SelectorConfig;
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::{ListingPage, ListingPageParser};
pub use profile_parser::{LotPageParser, SellerProfileParser};
pub use review_parser::{ReviewPage, ReviewPageParser};
pub use selector_chain::SelectorChain;

use scraper::Html;

/// Parser over a whole page with contextual information
pub trait ContextualParser {
    type Output;

    /// Extract from an already parsed document
    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> Self::Output;

    /// Parse a raw page body and extract from it
    fn parse_document(&self, body: &str, context: &ParseContext) -> Self::Output {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }
}

/// All page parsers, compiled once from a [`SelectorConfig`]
pub struct MarketParsers {
    pub catalog: CatalogParser,
    pub listing: ListingPageParser,
    pub profile: SellerProfileParser,
    pub lot: LotPageParser,
    pub review: ReviewPageParser,
}

impl MarketParsers {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&SelectorConfig::default())
    }

    pub fn with_config(config: &SelectorConfig) -> ParsingResult<Self> {
        Ok(Self {
            catalog: CatalogParser::with_config(&config.catalog)?,
            listing: ListingPageParser::with_config(&config.listing)?,
            profile: SellerProfileParser::with_config(&config.profile, &config.listing)?,
            lot: LotPageParser::with_config(&config.lot)?,
            review: ReviewPageParser::with_config(&config.review)?,
        })
    }
}
