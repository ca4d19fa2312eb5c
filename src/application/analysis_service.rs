//! Analysis entry points
//!
//! [`MarketAnalyzer`] wires a [`PageSource`], the compiled page parsers and
//! the configuration into the three operations callers use: category
//! analysis, seller analysis and the category catalogue, plus the
//! [`analyze`](MarketAnalyzer::analyze) dispatcher that picks one of them
//! from a free-form target.

#![allow(clippy::uninlined_format_args)]

use tracing::{debug, info, warn};

use super::category_analysis::aggregate_category;
use super::dto::{AnalysisResponse, CategoryReport, ErrorBody, SellerReport};
use super::error::{AnalysisError, AnalysisResult};
use super::paginator::Paginator;
use super::seller_analysis::aggregate_seller;
use crate::domain::target::resolve_user_id;
use crate::domain::{CategoryEntry, Currency, TargetKind};
use crate::infrastructure::parsing::{ContextualParser, MarketParsers, ParseContext, SelectorConfig};
use crate::infrastructure::{AnalystConfig, PageSource};

pub struct MarketAnalyzer<S: PageSource> {
    source: S,
    parsers: MarketParsers,
    config: AnalystConfig,
}

impl<S: PageSource> MarketAnalyzer<S> {
    /// Create an analyzer with the default selectors
    pub fn new(source: S, config: AnalystConfig) -> AnalysisResult<Self> {
        Self::with_selectors(source, config, &SelectorConfig::default())
    }

    pub fn with_selectors(
        source: S,
        config: AnalystConfig,
        selectors: &SelectorConfig,
    ) -> AnalysisResult<Self> {
        Ok(Self {
            source,
            parsers: MarketParsers::with_config(selectors)?,
            config,
        })
    }

    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn base_url(&self) -> &str {
        self.config.http.base_url.trim_end_matches('/')
    }

    fn parse_context(&self) -> ParseContext {
        ParseContext::new(self.base_url())
    }

    fn paginator(&self, currency: Currency) -> Paginator<'_, S> {
        Paginator::new(&self.source, self.parse_context(), currency)
    }

    /// Analyze the listings of a category
    pub async fn analyze_category(
        &self,
        category_url: &str,
        currency: Currency,
    ) -> AnalysisResult<CategoryReport> {
        info!("📊 Analyzing category {} ({})", category_url, currency);
        let listings = self
            .paginator(currency)
            .collect_listings(
                &self.parsers.listing,
                category_url,
                self.config.pagination.category_max_pages,
            )
            .await;

        if listings.is_empty() {
            return Err(AnalysisError::NoCategoryData {
                url: category_url.to_string(),
            });
        }

        let report = aggregate_category(listings, &self.config.analysis);
        info!(
            "✅ Category analyzed: {} lots from {} sellers",
            report.total_lots, report.total_sellers
        );
        Ok(report)
    }

    /// Analyze a seller given a numeric id or a profile URL.
    ///
    /// `max_reviews` caps the reviews fetched; callers clamp it first.
    pub async fn analyze_seller(
        &self,
        target: &str,
        currency: Currency,
        max_reviews: usize,
    ) -> AnalysisResult<SellerReport> {
        let user_id = resolve_user_id(target).map_err(|e| {
            debug!("Seller target rejected: {}", e);
            AnalysisError::InvalidSellerLink {
                target: target.to_string(),
            }
        })?;
        info!("👤 Analyzing seller {} ({})", user_id, currency);

        let profile_url = format!("{}/users/{}/", self.base_url(), user_id);
        let body = self
            .source
            .fetch_page(&profile_url, currency)
            .await
            .map_err(|e| {
                warn!("Profile page unavailable: {}", e);
                AnalysisError::NoSellerData { user_id }
            })?;
        let profile = self
            .parsers
            .profile
            .parse_profile_document(&body, &self.parse_context(), user_id);

        let reviews = self
            .paginator(currency)
            .collect_reviews(
                &self.parsers.review,
                &profile_url,
                self.config.pagination.review_page_size,
                max_reviews,
            )
            .await;

        let report = aggregate_seller(profile, &reviews, &self.config.analysis);
        info!(
            "✅ Seller analyzed: '{}' with {} reviews parsed",
            report.name, report.reviews_parsed
        );
        Ok(report)
    }

    /// Game categories listed on the home page; empty when it cannot be fetched
    pub async fn get_categories(&self) -> Vec<CategoryEntry> {
        let home = format!("{}/", self.base_url());
        match self.source.fetch_page(&home, Currency::default()).await {
            Ok(body) => self.parsers.catalog.parse_document(&body, &self.parse_context()),
            Err(e) => {
                warn!("Home page unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Analyze whatever `target` points at.
    ///
    /// Bare digits are a category id, lot links are followed to their seller,
    /// profile links go to seller analysis and anything else is treated as a
    /// category URL. `max_reviews` is clamped to the configured bounds.
    pub async fn analyze(&self, target: &str, currency: Currency, max_reviews: i64) -> AnalysisResponse {
        let kind = match TargetKind::classify(target, self.base_url()) {
            Ok(kind) => kind,
            Err(e) => return AnalysisResponse::Error(ErrorBody::from(&AnalysisError::from(e))),
        };
        let max_reviews = self.config.pagination.clamp_max_reviews(max_reviews);

        let kind = match kind {
            TargetKind::LotDetail(url) => self.follow_lot(url, currency).await,
            other => other,
        };

        match kind {
            TargetKind::Seller(url) => self.analyze_seller(&url, currency, max_reviews).await.into(),
            TargetKind::Category(url) | TargetKind::LotDetail(url) => {
                self.analyze_category(&url, currency).await.into()
            }
        }
    }

    /// Replace a lot link by its seller's profile link when the lot page names one
    async fn follow_lot(&self, lot_url: String, currency: Currency) -> TargetKind {
        let seller_url = match self.source.fetch_page(&lot_url, currency).await {
            Ok(body) => self.parsers.lot.parse_document(&body, &self.parse_context()),
            Err(e) => {
                warn!("Lot page unavailable: {}", e);
                None
            }
        };

        match seller_url {
            Some(url) => {
                debug!("Lot {} belongs to {}", lot_url, url);
                TargetKind::classify_url(url)
            }
            None => TargetKind::LotDetail(lot_url),
        }
    }
}
