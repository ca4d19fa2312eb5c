//! Test utilities for funpay-analyst
//!
//! Provides an in-memory [`PageSource`] and builders for the marketplace
//! markup the parsers understand, so pagination and analysis can be tested
//! without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::Currency;
use crate::infrastructure::{FetchError, FetchResult, PageSource};

/// Page source backed by a URL → body map; unknown URLs answer 404.
///
/// Every requested URL is recorded, in order, together with the currency.
#[derive(Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(String, Currency)>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` (builder style)
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|log| log.iter().map(|(url, _)| url.clone()).collect())
            .unwrap_or_default()
    }

    /// Currencies requested so far, in request order
    pub fn currencies(&self) -> Vec<Currency> {
        self.requests
            .lock()
            .map(|log| log.iter().map(|(_, currency)| *currency).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch_page(&self, url: &str, currency: Currency) -> FetchResult<String> {
        if let Ok(mut log) = self.requests.lock() {
            log.push((url.to_string(), currency));
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

// ============================================================================
// Markup builders
// ============================================================================

/// One `a.tc-item` listing card
pub fn listing_card(id: u32, seller: &str, title: &str, price: &str) -> String {
    listing_card_full(id, seller, title, price, 0, false)
}

/// Listing card with review count and online marker
pub fn listing_card_full(
    id: u32,
    seller: &str,
    title: &str,
    price: &str,
    reviews: u64,
    online: bool,
) -> String {
    let status = if online {
        r#"<div class="media-user-status online">Онлайн</div>"#
    } else {
        r#"<div class="media-user-status">Был давно</div>"#
    };
    format!(
        r#"<a class="tc-item" href="/lots/offer?id={id}">
             <div class="tc-desc-text">{title}</div>
             <div class="media-user-name">{seller}</div>
             {status}
             <div class="media-user-reviews">{reviews} отзывов</div>
             <div class="tc-price">{price} <span class="unit">₽</span></div>
           </a>"#
    )
}

/// Category page wrapping `cards`, optionally with a next-page link
pub fn listing_page(cards: &[String], has_next: bool) -> String {
    let next = if has_next {
        r#"<a class="pagination-next" href="?page=2">»</a>"#
    } else {
        ""
    };
    format!(
        "<html><body><div class=\"tc\">{}</div>{}</body></html>",
        cards.join("\n"),
        next
    )
}

/// One `.review-item` node
pub fn review_item(date: &str, stars: u8, text: &str, item: &str) -> String {
    format!(
        r#"<div class="review-item">
             <div class="review-item-user">
               <div class="review-item-date">{date}</div>
               <div class="review-item-rating"><div class="rating"><div class="rating{stars}"></div></div></div>
             </div>
             <div class="review-item-detail">{item}</div>
             <div class="review-item-text">{text}</div>
           </div>"#
    )
}

/// Profile page containing only reviews
pub fn review_page(items: &[String]) -> String {
    format!(
        "<html><body><div class=\"review-container\">{}</div></body></html>",
        items.join("\n")
    )
}

/// Full profile page: header, lots and reviews
pub fn profile_page(name: &str, rating: &str, total_reviews: u64, lots: &[String], reviews: &[String]) -> String {
    format!(
        r#"<html><body>
             <div class="profile-header"><h1 class="mb40 online"><span class="mr4">{name}</span></h1></div>
             <div class="rating-value"><span class="big">{rating}</span></div>
             <div class="rating-full-count"><a>Всего {total_reviews}<br>отзывов</a></div>
             <div class="offers">{lots}</div>
             <div class="review-container">{reviews}</div>
           </body></html>"#,
        lots = lots.join("\n"),
        reviews = reviews.join("\n"),
    )
}

/// Lot detail page linking to its seller
pub fn lot_page(seller_href: &str) -> String {
    format!(
        r#"<html><body><div class="param-item"><a href="{seller_href}">seller</a></div></body></html>"#
    )
}

/// Home page with one catalogue entry per `(href, name)`
pub fn catalog_page(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(href, name)| {
            format!(r#"<div class="promo-game-item"><a href="{href}">{name}</a><div class="game-title">{name}</div></div>"#)
        })
        .collect();
    format!("<html><body>{}</body></html>", items.join("\n"))
}
