//! Home page game catalogue parser

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::config::CatalogSelectors;
use super::normalize::resolve_url;
use super::selector_chain::compact_text;
use super::{ContextualParser, ParseContext, ParsingResult, SelectorChain};
use crate::domain::CategoryEntry;

static CATEGORY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)/").expect("valid category id regex"));

pub struct CatalogParser {
    item: SelectorChain,
    link: SelectorChain,
    name: SelectorChain,
}

impl CatalogParser {
    pub fn with_config(selectors: &CatalogSelectors) -> ParsingResult<Self> {
        Ok(Self {
            item: SelectorChain::compile("catalog.item", &selectors.item)?,
            link: SelectorChain::compile("catalog.link", &selectors.link)?,
            name: SelectorChain::compile("catalog.name", &selectors.name)?,
        })
    }
}

impl ContextualParser for CatalogParser {
    type Output = Vec<CategoryEntry>;

    /// Entries need both a link and a name; the id is the first numeric path segment
    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> Vec<CategoryEntry> {
        let entries: Vec<CategoryEntry> = self
            .item
            .all_in(html)
            .into_iter()
            .filter_map(|item| {
                let href = self.link.first(item)?.value().attr("href").unwrap_or_default();
                let name = compact_text(self.name.first(item)?);
                let id = CATEGORY_ID_RE
                    .captures(href)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string());
                Some(CategoryEntry {
                    id,
                    name,
                    url: resolve_url(href, &context.base_url),
                })
            })
            .collect();

        debug!("Parsed {} catalogue entries", entries.len());
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_entries() {
        let parser = CatalogParser::with_config(&CatalogSelectors::default()).unwrap();
        let entries = parser.parse_document(
            r#"
            <div class="promo-game-item">
              <div class="game-title"><a href="/lots/81/">Genshin Impact</a></div>
            </div>
            <div class="promo-game-item">
              <a href="https://funpay.com/chips/2/">Lineage</a>
              <span class="game-title">Lineage 2</span>
            </div>
            <div class="promo-game-item"><a href="/about/">no title</a></div>
            <div class="promo-game-item">
              <a href="/special/">Misc</a><div class="game-title">Misc</div>
            </div>
            "#,
            &ParseContext::new("https://funpay.com"),
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id.as_deref(), Some("81"));
        assert_eq!(entries[0].name, "Genshin Impact");
        assert_eq!(entries[0].url, "https://funpay.com/lots/81/");
        assert_eq!(entries[1].id.as_deref(), Some("2"));
        assert_eq!(entries[1].url, "https://funpay.com/chips/2/");
        assert_eq!(entries[2].id, None);
    }
}
