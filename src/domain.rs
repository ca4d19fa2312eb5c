//! Domain module - Core marketplace entities and value objects
//!
//! This module contains the marketplace records produced by extraction
//! (listings, seller profiles, reviews), the value objects used to address
//! the source site (currency, analysis targets, pagination) and the ordered
//! tallies the aggregators build on.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod currency;
pub mod entities;
pub mod pagination;
pub mod tally;
pub mod target;

// Re-export commonly used items for convenience
pub use currency::Currency;
pub use entities::{
    CategoryEntry, Listing, MarketNiche, PriceBucket, ProfileLot, ReviewKey, ReviewRecord,
    SellerProfile, SellerSummary,
};
pub use pagination::{ListingKey, PageMode, SeenKeys};
pub use tally::OrderedTally;
pub use target::{TargetError, TargetKind};
