//! Sequential pagination over a [`PageSource`]
//!
//! Pages are fetched one at a time. Each page body is parsed into owned
//! records before the next request is awaited, and records are kept only the
//! first time their identity key is seen. A fetch failure ends the run and
//! whatever was collected so far is returned.

#![allow(clippy::uninlined_format_args)]

use tracing::{debug, info, warn};

use crate::domain::{Currency, Listing, ListingKey, PageMode, ReviewRecord, SeenKeys};
use crate::infrastructure::parsing::{
    ContextualParser, ListingPageParser, ParseContext, ReviewPageParser,
};
use crate::infrastructure::PageSource;

/// Drives one target's pages through a source and a page parser
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    context: ParseContext,
    currency: Currency,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S, context: ParseContext, currency: Currency) -> Self {
        Self {
            source,
            context,
            currency,
        }
    }

    async fn fetch(&self, url: &str) -> Option<String> {
        match self.source.fetch_page(url, self.currency).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("⚠️ Stopping pagination, page unavailable: {}", e);
                None
            }
        }
    }

    /// Collect category listings in page-number mode.
    ///
    /// Stops on a fetch failure, an empty page, a page with nothing new, a
    /// missing next-page marker after the first page, or the page cap.
    pub async fn collect_listings(
        &self,
        parser: &ListingPageParser,
        seed_url: &str,
        max_pages: u32,
    ) -> Vec<Listing> {
        let mode = PageMode::PageNumber;
        let mut seen: SeenKeys<ListingKey> = SeenKeys::new();
        let mut listings = Vec::new();

        for index in 0..max_pages as usize {
            let url = mode.page_url(seed_url, index);
            let Some(body) = self.fetch(&url).await else {
                break;
            };

            let page = parser.parse_document(&body, &self.context.clone().with_page(index));
            if page.listings.is_empty() {
                debug!("Page {} has no listings, stopping", index + 1);
                break;
            }

            let before = listings.len();
            for listing in page.listings {
                let key = ListingKey {
                    url: listing.url.clone(),
                    seller: listing.seller.clone(),
                    title: listing.title.clone(),
                };
                if seen.first_seen(key) {
                    listings.push(listing);
                }
            }
            let added = listings.len() - before;
            info!("📄 Page {}: +{} listings, {} total", index + 1, added, listings.len());

            if added == 0 {
                debug!("Page {} repeated earlier listings, stopping", index + 1);
                break;
            }
            if index > 0 && !page.has_next {
                debug!("No next page after page {}, stopping", index + 1);
                break;
            }
        }

        listings
    }

    /// Collect reviews in offset mode, at most `max_records` of them.
    ///
    /// Stops on a fetch failure, a page without review nodes, a short page,
    /// a page with nothing new, or once the cap is reached.
    pub async fn collect_reviews(
        &self,
        parser: &ReviewPageParser,
        profile_url: &str,
        page_size: usize,
        max_records: usize,
    ) -> Vec<ReviewRecord> {
        let page_size = page_size.max(1);
        let mode = PageMode::Offset { page_size };
        let mut seen = SeenKeys::new();
        let mut reviews: Vec<ReviewRecord> = Vec::new();
        let mut index = 0;

        while reviews.len() < max_records {
            let url = mode.page_url(profile_url, index);
            let Some(body) = self.fetch(&url).await else {
                break;
            };

            let page = parser.parse_document(&body, &self.context.clone().with_page(index));
            if page.raw_count == 0 {
                debug!("No review nodes at skip={}, stopping", index * page_size);
                break;
            }

            let before = reviews.len();
            for record in page.records {
                if seen.first_seen(record.key()) {
                    reviews.push(record);
                }
            }
            let added = reviews.len() - before;
            info!(
                "💬 Reviews page {} (skip={}): +{}, {} total",
                index + 1,
                index * page_size,
                added,
                reviews.len()
            );

            if page.raw_count < page_size {
                debug!("Short review page ({} < {}), stopping", page.raw_count, page_size);
                break;
            }
            if added == 0 {
                debug!("Review page {} repeated earlier reviews, stopping", index + 1);
                break;
            }
            index += 1;
        }

        reviews.truncate(max_records);
        reviews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::{ListingSelectors, ReviewSelectors};
    use crate::test_utils::{StaticPageSource, listing_card, listing_page, review_item, review_page};

    const BASE: &str = "https://funpay.com";

    fn listing_parser() -> ListingPageParser {
        ListingPageParser::with_config(&ListingSelectors::default()).unwrap()
    }

    fn review_parser() -> ReviewPageParser {
        ReviewPageParser::with_config(&ReviewSelectors::default()).unwrap()
    }

    fn paginator(source: &StaticPageSource) -> Paginator<'_, StaticPageSource> {
        Paginator::new(source, ParseContext::new(BASE), Currency::Rub)
    }

    #[tokio::test]
    async fn test_listings_follow_next_page() {
        let source = StaticPageSource::new()
            .with_page(
                "https://funpay.com/lots/81/",
                listing_page(&[listing_card(1, "a", "Gold", "10"), listing_card(2, "b", "Gold", "20")], true),
            )
            .with_page(
                "https://funpay.com/lots/81/?page=2",
                listing_page(&[listing_card(3, "c", "Gold", "30")], false),
            );

        let listings = paginator(&source)
            .collect_listings(&listing_parser(), "https://funpay.com/lots/81/", 5)
            .await;

        assert_eq!(listings.len(), 3);
        assert_eq!(
            source.requested(),
            vec!["https://funpay.com/lots/81/", "https://funpay.com/lots/81/?page=2"]
        );
    }

    #[tokio::test]
    async fn test_listings_respect_page_cap_and_duplicates() {
        let card = listing_card(1, "a", "Gold", "10");
        let source = StaticPageSource::new()
            .with_page("https://funpay.com/lots/81/", listing_page(&[card.clone()], true))
            .with_page("https://funpay.com/lots/81/?page=2", listing_page(&[card], true));

        let listings = paginator(&source)
            .collect_listings(&listing_parser(), "https://funpay.com/lots/81", 3)
            .await;

        assert_eq!(listings.len(), 1);
        assert_eq!(source.requested().len(), 2);

        let capped = StaticPageSource::new()
            .with_page("https://funpay.com/lots/81/", listing_page(&[listing_card(1, "a", "Gold", "10")], true));
        paginator(&capped)
            .collect_listings(&listing_parser(), "https://funpay.com/lots/81/", 1)
            .await;
        assert_eq!(capped.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_listings_fetch_failure_keeps_partial() {
        let source = StaticPageSource::new().with_page(
            "https://funpay.com/lots/81/",
            listing_page(&[listing_card(1, "a", "Gold", "10")], true),
        );

        let listings = paginator(&source)
            .collect_listings(&listing_parser(), "https://funpay.com/lots/81/", 2)
            .await;

        assert_eq!(listings.len(), 1);
    }

    fn full_review_page(offset: usize) -> String {
        let items: Vec<String> = (0..25)
            .map(|i| review_item("Сегодня", 5, &format!("review {}", offset + i), "Gold"))
            .collect();
        review_page(&items)
    }

    #[tokio::test]
    async fn test_reviews_offset_pagination_until_short_page() {
        let source = StaticPageSource::new()
            .with_page("https://funpay.com/users/9/", full_review_page(0))
            .with_page("https://funpay.com/users/9/?skip=25", review_page(&[review_item("Вчера", 4, "last", "Gold")]));

        let reviews = paginator(&source)
            .collect_reviews(&review_parser(), "https://funpay.com/users/9/", 25, 1000)
            .await;

        assert_eq!(reviews.len(), 26);
        assert_eq!(
            source.requested(),
            vec!["https://funpay.com/users/9/", "https://funpay.com/users/9/?skip=25"]
        );
    }

    #[tokio::test]
    async fn test_repeated_review_page_stops_and_dedups() {
        let source = StaticPageSource::new()
            .with_page("https://funpay.com/users/9/", full_review_page(0))
            .with_page("https://funpay.com/users/9/?skip=25", full_review_page(0));

        let reviews = paginator(&source)
            .collect_reviews(&review_parser(), "https://funpay.com/users/9/", 25, 1000)
            .await;

        assert_eq!(reviews.len(), 25);
        assert_eq!(source.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_reviews_truncated_to_cap() {
        let source = StaticPageSource::new()
            .with_page("https://funpay.com/users/9/", full_review_page(0))
            .with_page("https://funpay.com/users/9/?skip=25", full_review_page(25));

        let reviews = paginator(&source)
            .collect_reviews(&review_parser(), "https://funpay.com/users/9/", 25, 10)
            .await;

        assert_eq!(reviews.len(), 10);
        assert_eq!(source.requested().len(), 1);
    }
}
