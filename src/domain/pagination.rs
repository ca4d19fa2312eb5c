//! Pagination domain logic centralization.
//!
//! Responsibility:
//! - page URL addressing for the two schemes the marketplace uses
//!   (page numbers for categories, `skip` offsets for seller reviews)
//! - first-seen deduplication of records across pages

use std::collections::HashSet;
use std::hash::Hash;

/// Review page size used by the profile `skip` pagination
pub const REVIEW_PAGE_SIZE: usize = 25;

/// How consecutive pages of one target are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Page 1 is the bare URL, later pages append `?page=N`
    PageNumber,
    /// First request has no offset, later requests append `?skip=K`
    Offset { page_size: usize },
}

impl PageMode {
    /// URL of the zero-based `index`-th page of `base_url`
    pub fn page_url(&self, base_url: &str, index: usize) -> String {
        let base = normalize_base(base_url);
        match self {
            PageMode::PageNumber => {
                if index == 0 {
                    base
                } else {
                    format!("{}?page={}", base, index + 1)
                }
            }
            PageMode::Offset { page_size } => {
                if index == 0 {
                    base
                } else {
                    format!("{}?skip={}", base, index * page_size)
                }
            }
        }
    }
}

/// Strip any query string and make sure the path ends with a single slash
pub fn normalize_base(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or_default();
    format!("{}/", without_query.trim_end_matches('/'))
}

/// Identity of a listing across category pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub url: String,
    pub seller: String,
    pub title: String,
}

/// Insertion-only set of identity keys seen during one pagination run
#[derive(Debug, Clone)]
pub struct SeenKeys<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> Default for SeenKeys<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> SeenKeys<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; returns true when it had not been seen before
    pub fn first_seen(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
