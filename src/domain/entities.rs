//! Marketplace entities produced by extraction and consumed by aggregation

use serde::{Deserialize, Serialize};

/// Characters of review text that take part in the review identity key
pub const REVIEW_KEY_TEXT_CHARS: usize = 50;

/// A single active offer in a category listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub seller: String,
    pub title: String,
    /// Numeric price in the requested currency, 0.0 when unparseable
    pub price: f64,
    /// Seller review count as shown next to the listing
    pub reviews: u64,
    pub online: bool,
    pub url: String,
}

/// Per-seller fold of the listings of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    pub name: String,
    pub lots_count: usize,
    pub first_lot_url: String,
    pub reviews: u64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub online: bool,
    #[serde(skip)]
    price_sum: f64,
    #[serde(skip)]
    priced_lots: usize,
}

impl SellerSummary {
    /// Start a summary from the first listing seen for a seller.
    ///
    /// Review count, online flag and representative URL are taken from this
    /// listing and never revised by later listings of the same seller.
    pub fn from_first(listing: &Listing) -> Self {
        let mut summary = Self {
            name: listing.seller.clone(),
            lots_count: 0,
            first_lot_url: listing.url.clone(),
            reviews: listing.reviews,
            min_price: 0.0,
            max_price: 0.0,
            avg_price: 0.0,
            online: listing.online,
            price_sum: 0.0,
            priced_lots: 0,
        };
        summary.absorb(listing);
        summary
    }

    /// Fold another listing of the same seller into the summary
    pub fn absorb(&mut self, listing: &Listing) {
        self.lots_count += 1;
        if listing.price <= 0.0 {
            return;
        }
        if self.priced_lots == 0 {
            self.min_price = listing.price;
            self.max_price = listing.price;
        } else {
            self.min_price = self.min_price.min(listing.price);
            self.max_price = self.max_price.max(listing.price);
        }
        self.price_sum += listing.price;
        self.priced_lots += 1;
        self.avg_price = round2(self.price_sum / self.priced_lots as f64);
    }

    /// Number of listings that carried a positive price
    pub fn priced_lots(&self) -> usize {
        self.priced_lots
    }
}

/// An active lot as listed on a seller's profile page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLot {
    pub title: String,
    pub price: f64,
    /// Price text exactly as rendered, currency symbol included
    pub price_text: String,
    pub url: String,
}

/// Fields of a seller's profile page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub user_id: u64,
    pub name: String,
    pub online: bool,
    pub total_reviews: u64,
    /// Profile rating in [0, 5]
    pub rating: f64,
    pub lots: Vec<ProfileLot>,
}

/// One buyer review from a seller's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Date text as rendered, empty when the review had no date element
    pub date_raw: String,
    /// Month token ("Окт 2026") or the raw date when it could not be normalized
    pub month: Option<String>,
    /// Star count 1..=5, 0 when undetermined
    pub stars: u8,
    /// Description of the purchased item
    pub item: Option<String>,
    pub text: Option<String>,
}

/// Identity of a review across paginated fetches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewKey {
    pub date: String,
    pub text_prefix: String,
}

impl ReviewRecord {
    pub fn key(&self) -> ReviewKey {
        ReviewKey {
            date: self.date_raw.trim().to_string(),
            text_prefix: self
                .text
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(REVIEW_KEY_TEXT_CHARS)
                .collect(),
        }
    }
}

/// One interval of the price histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub range: String,
    pub count: usize,
    pub lo: f64,
    pub hi: f64,
}

impl PriceBucket {
    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }
}

/// A low-competition price range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketNiche {
    pub range: String,
    pub count: usize,
    /// Bucket count relative to the most populated bucket, in percent
    pub competition_pct: u32,
    pub recommended_price: f64,
}

/// A game category from the marketplace home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: Option<String>,
    pub name: String,
    pub url: String,
}

/// Round to two decimals the way prices are reported
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
