//! Parsing context for HTML extraction
//!
//! Provides the context object shared by the page parsers.

use chrono::{Local, NaiveDate};

/// Context information for parsing operations
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Base URL for resolving relative links
    pub base_url: String,

    /// Zero-based index of the page within its pagination run
    pub page_index: usize,

    /// Reference date for relative review dates ("вчера", "в этом месяце")
    pub today: NaiveDate,
}

impl ParseContext {
    /// Create new parse context dated today
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_index: 0,
            today: Local::now().date_naive(),
        }
    }

    /// Set the page index
    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }

    /// Pin the reference date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
