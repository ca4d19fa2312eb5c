//! Ordered selector fallbacks
//!
//! A [`SelectorChain`] is a list of compiled CSS selectors evaluated in order
//! with early exit on the first candidate that matches anything.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{ParsingError, ParsingResult};

#[derive(Debug, Clone)]
pub struct SelectorChain {
    field: String,
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compile selector candidates for `field`.
    ///
    /// Candidates that fail to compile are logged and skipped; a chain left
    /// with no valid selector is an error.
    pub fn compile(field: &str, candidates: &[String]) -> ParsingResult<Self> {
        let mut selectors = Vec::new();
        let mut errors = Vec::new();

        for candidate in candidates {
            match Selector::parse(candidate) {
                Ok(selector) => selectors.push(selector),
                Err(e) => {
                    let error = ParsingError::invalid_selector(candidate, &e.to_string());
                    warn!("Failed to compile selector for '{}': {}", field, error);
                    errors.push(format!("'{}': {}", candidate, e));
                }
            }
        }

        if selectors.is_empty() {
            return Err(ParsingError::EmptySelectorChain {
                field: field.to_string(),
                errors: errors.join(", "),
            });
        }

        if !errors.is_empty() {
            debug!("Some selectors for '{}' failed to compile: {}", field, errors.join(", "));
        }

        Ok(Self {
            field: field.to_string(),
            selectors,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// First element below `scope` matched by the highest-priority candidate that matches
    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// [`first`](Self::first) over a whole document
    pub fn first_in<'a>(&self, html: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| html.select(selector).next())
    }

    /// Every element matched by the first candidate that matches anything
    pub fn all_in<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let found: Vec<ElementRef<'a>> = html.select(selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Whether any candidate matches below `scope`
    pub fn matches(&self, scope: ElementRef<'_>) -> bool {
        self.first(scope).is_some()
    }

    /// Whether any candidate matches in the document
    pub fn matches_in(&self, html: &Html) -> bool {
        self.first_in(html).is_some()
    }
}

/// Text of all descendants, each fragment trimmed, concatenated without separator
pub fn compact_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect::<String>()
}

/// Text of all descendants, trimmed fragments joined by single spaces
pub fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_priority_order_wins_over_document_order() {
        let html = Html::parse_fragment(
            r#"<div><span class="b">second</span><span class="a">first</span></div>"#,
        );
        let chain = SelectorChain::compile("field", &candidates(&[".a", ".b"])).unwrap();
        let found = chain.first_in(&html).map(compact_text);
        assert_eq!(found.as_deref(), Some("first"));
    }

    #[test]
    fn test_invalid_candidates_are_skipped() {
        let chain = SelectorChain::compile("field", &candidates(&["[[[", ".ok"])).unwrap();
        let html = Html::parse_fragment(r#"<p class="ok">yes</p>"#);
        assert!(chain.matches_in(&html));
        assert_eq!(chain.field(), "field");
    }

    #[test]
    fn test_chain_without_valid_selector_is_error() {
        let result = SelectorChain::compile("field", &candidates(&["[[["]));
        assert!(matches!(result, Err(ParsingError::EmptySelectorChain { .. })));
    }

    #[test]
    fn test_text_helpers() {
        let html = Html::parse_fragment("<div class=\"n\">\n  Seller <b> Pro </b>\n</div>");
        let chain = SelectorChain::compile("n", &candidates(&[".n"])).unwrap();
        let element = chain.first_in(&html).unwrap();
        assert_eq!(compact_text(element), "SellerPro");
        assert_eq!(spaced_text(element), "Seller Pro");
    }
}
