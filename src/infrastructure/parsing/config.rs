//! Selector configuration for HTML extraction
//!
//! Centralized, ordered CSS selector candidates for every extracted field.
//! Earlier entries take priority; later ones are fallbacks for markup
//! variations of the marketplace.

use serde::{Deserialize, Serialize};

/// Main selector configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub catalog: CatalogSelectors,
    pub listing: ListingSelectors,
    pub profile: ProfileSelectors,
    pub lot: LotSelectors,
    pub review: ReviewSelectors,
}

/// Home page game catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSelectors {
    pub item: Vec<String>,
    pub link: Vec<String>,
    pub name: Vec<String>,
}

/// Category listing pages (also used for the lots on a profile page)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Listing containers; the container itself carries the lot link
    pub container: Vec<String>,
    pub seller: Vec<String>,
    pub price: Vec<String>,
    pub reviews: Vec<String>,
    pub title: Vec<String>,
    /// Presence of any match marks the seller as online
    pub online: Vec<String>,
    /// Presence of any match means there is another page
    pub next_page: Vec<String>,
}

/// Seller profile header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSelectors {
    pub name: Vec<String>,
    pub online: Vec<String>,
    pub total_reviews: Vec<String>,
    pub rating: Vec<String>,
}

/// Single lot page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSelectors {
    /// Link to the owning seller, read from `href` or `data-href`
    pub seller_link: Vec<String>,
}

/// Review items on a profile page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSelectors {
    pub container: Vec<String>,
    pub date: Vec<String>,
    pub text: Vec<String>,
    pub item: Vec<String>,
    /// Element whose descendants carry a `ratingN` class
    pub rating: Vec<String>,
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            item: list(&["div.promo-game-item"]),
            link: list(&["a"]),
            name: list(&[".game-title"]),
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: list(&["a.tc-item"]),
            seller: list(&[".media-user-name"]),
            price: list(&[".tc-price"]),
            reviews: list(&[
                ".media-user-reviews",
                ".media-user-reviews-count",
                ".tc-reviews",
                ".rating-mini-count",
                "span[class*='review']",
            ]),
            title: list(&[".tc-desc-text", ".tc-title"]),
            online: list(&[".media-user-status.online", ".online"]),
            next_page: list(&["a.pagination-next", "a[rel='next']", "li.next a"]),
        }
    }
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            name: list(&[
                ".profile-header .media-user-name",
                ".profile-header h1",
                "h1.profile-name",
                ".username",
                ".mr4",
            ]),
            online: list(&[
                "h1.online",
                ".profile-header .online",
                ".media-user-status.online",
            ]),
            total_reviews: list(&[
                ".rating-full-count a",
                "a[href*='#reviews']",
                ".rating-full + span",
                ".reviews-count",
                "span[class*='review-count']",
            ]),
            rating: list(&[
                ".rating-value .big",
                ".rating-value span.big",
                ".rating-mini-value .big",
                ".rating-full span.big",
            ]),
        }
    }
}

impl Default for LotSelectors {
    fn default() -> Self {
        Self {
            seller_link: list(&["a[href*='/users/']", "div[data-href*='/users/']"]),
        }
    }
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            container: list(&[".review-item"]),
            date: list(&[".review-item-date"]),
            text: list(&[".review-item-text"]),
            item: list(&[".review-item-detail", ".review-item-desc", ".review-item-title"]),
            rating: list(&[".review-item-rating", ".review-item-user .rating"]),
        }
    }
}
