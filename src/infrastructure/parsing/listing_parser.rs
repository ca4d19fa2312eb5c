//! Category listing page parser
//!
//! Extracts every lot card of a category page together with the marker that
//! tells the paginator whether another page exists.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html};
use tracing::debug;

use super::config::ListingSelectors;
use super::normalize::{parse_count, parse_price, resolve_url, strip_online_badge, UNKNOWN_SELLER};
use super::selector_chain::{compact_text, spaced_text};
use super::{ContextualParser, ParseContext, ParsingResult, SelectorChain};
use crate::domain::Listing;

/// Listings of one page plus the next-page marker
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub has_next: bool,
}

/// Parser for category listing pages
pub struct ListingPageParser {
    container: SelectorChain,
    seller: SelectorChain,
    price: SelectorChain,
    reviews: SelectorChain,
    title: SelectorChain,
    online: SelectorChain,
    next_page: SelectorChain,
}

impl ListingPageParser {
    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container: SelectorChain::compile("listing.container", &selectors.container)?,
            seller: SelectorChain::compile("listing.seller", &selectors.seller)?,
            price: SelectorChain::compile("listing.price", &selectors.price)?,
            reviews: SelectorChain::compile("listing.reviews", &selectors.reviews)?,
            title: SelectorChain::compile("listing.title", &selectors.title)?,
            online: SelectorChain::compile("listing.online", &selectors.online)?,
            next_page: SelectorChain::compile("listing.next_page", &selectors.next_page)?,
        })
    }

    /// Extract one listing from its container element
    fn extract_listing(&self, card: ElementRef<'_>, context: &ParseContext) -> Listing {
        let seller = self
            .seller
            .first(card)
            .map(|el| strip_online_badge(&spaced_text(el)))
            .unwrap_or_else(|| UNKNOWN_SELLER.to_string());

        let price = self
            .price
            .first(card)
            .map(|el| parse_price(&compact_text(el)))
            .unwrap_or(0.0);

        let reviews = self
            .reviews
            .first(card)
            .map(|el| parse_count(&compact_text(el)))
            .unwrap_or(0);

        let title = self
            .title
            .first(card)
            .map(compact_text)
            .unwrap_or_default();

        let url = card
            .value()
            .attr("href")
            .map(|href| resolve_url(href, &context.base_url))
            .unwrap_or_default();

        Listing {
            seller,
            title,
            price,
            reviews,
            online: self.online.matches(card),
            url,
        }
    }
}

impl ContextualParser for ListingPageParser {
    type Output = ListingPage;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ListingPage {
        let listings: Vec<Listing> = self
            .container
            .all_in(html)
            .into_iter()
            .map(|card| self.extract_listing(card, context))
            .collect();

        let has_next = self.next_page.matches_in(html);
        debug!(
            "Parsed {} listings on page {} (next page: {})",
            listings.len(),
            context.page_index + 1,
            has_next
        );

        ListingPage { listings, has_next }
    }
}
