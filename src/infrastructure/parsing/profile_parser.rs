//! Seller profile and lot detail parsers

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html};
use tracing::debug;

use super::config::{ListingSelectors, LotSelectors, ProfileSelectors};
use super::normalize::{parse_count, parse_price, parse_rating, resolve_url, strip_online_badge};
use super::selector_chain::{compact_text, spaced_text};
use super::{ContextualParser, ParseContext, ParsingResult, SelectorChain};
use crate::domain::{ProfileLot, SellerProfile};

/// Parser for the header and active lots of a seller profile page
pub struct SellerProfileParser {
    name: SelectorChain,
    online: SelectorChain,
    total_reviews: SelectorChain,
    rating: SelectorChain,
    lot_container: SelectorChain,
    lot_price: SelectorChain,
    lot_title: SelectorChain,
}

impl SellerProfileParser {
    /// Profile header selectors plus the listing selectors used for the lot cards
    pub fn with_config(
        selectors: &ProfileSelectors,
        lots: &ListingSelectors,
    ) -> ParsingResult<Self> {
        Ok(Self {
            name: SelectorChain::compile("profile.name", &selectors.name)?,
            online: SelectorChain::compile("profile.online", &selectors.online)?,
            total_reviews: SelectorChain::compile("profile.total_reviews", &selectors.total_reviews)?,
            rating: SelectorChain::compile("profile.rating", &selectors.rating)?,
            lot_container: SelectorChain::compile("profile.lot_container", &lots.container)?,
            lot_price: SelectorChain::compile("profile.lot_price", &lots.price)?,
            lot_title: SelectorChain::compile("profile.lot_title", &lots.title)?,
        })
    }

    /// Parse the profile page of `user_id`
    pub fn parse_profile(&self, html: &Html, context: &ParseContext, user_id: u64) -> SellerProfile {
        let name = self
            .name
            .first_in(html)
            .map(|el| strip_online_badge(&spaced_text(el)))
            .unwrap_or_else(|| user_id.to_string());

        let total_reviews = self
            .total_reviews
            .first_in(html)
            .map(|el| parse_count(&compact_text(el)))
            .unwrap_or(0);

        let rating = self
            .rating
            .first_in(html)
            .map(|el| parse_rating(&compact_text(el)))
            .unwrap_or(0.0);

        let lots: Vec<ProfileLot> = self
            .lot_container
            .all_in(html)
            .into_iter()
            .filter_map(|card| self.extract_lot(card, context))
            .collect();

        debug!(
            "Parsed profile {} ('{}'): {} reviews, rating {}, {} lots",
            user_id,
            name,
            total_reviews,
            rating,
            lots.len()
        );

        SellerProfile {
            user_id,
            name,
            online: self.online.matches_in(html),
            total_reviews,
            rating,
            lots,
        }
    }

    /// Parse a raw profile page body
    pub fn parse_profile_document(&self, body: &str, context: &ParseContext, user_id: u64) -> SellerProfile {
        let html = Html::parse_document(body);
        self.parse_profile(&html, context, user_id)
    }

    /// A lot card counts only when it has both a price and a title
    fn extract_lot(&self, card: ElementRef<'_>, context: &ParseContext) -> Option<ProfileLot> {
        let price_el = self.lot_price.first(card)?;
        let title_el = self.lot_title.first(card)?;
        let price_text = compact_text(price_el);

        Some(ProfileLot {
            title: compact_text(title_el),
            price: parse_price(&price_text),
            price_text,
            url: card
                .value()
                .attr("href")
                .map(|href| resolve_url(href, &context.base_url))
                .unwrap_or_else(|| resolve_url("", &context.base_url)),
        })
    }
}

/// Parser for a single lot page; finds the owning seller's profile link
pub struct LotPageParser {
    seller_link: SelectorChain,
}

impl LotPageParser {
    pub fn with_config(selectors: &LotSelectors) -> ParsingResult<Self> {
        Ok(Self {
            seller_link: SelectorChain::compile("lot.seller_link", &selectors.seller_link)?,
        })
    }
}

impl ContextualParser for LotPageParser {
    type Output = Option<String>;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> Option<String> {
        let element = self.seller_link.first_in(html)?;
        let href = element
            .value()
            .attr("href")
            .or_else(|| element.value().attr("data-href"))?;
        Some(resolve_url(href, &context.base_url))
    }
}
