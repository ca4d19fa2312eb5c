//! Review parser for seller profile pages

use scraper::{ElementRef, Html};

use super::config::ReviewSelectors;
use super::normalize::{month_token, stars_in};
use super::selector_chain::compact_text;
use super::{ContextualParser, ParseContext, ParsingResult, SelectorChain};
use crate::domain::ReviewRecord;

/// Reviews of one profile page.
///
/// `raw_count` is the number of review nodes on the page, which the offset
/// paginator compares against the page size to detect the last page.
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub records: Vec<ReviewRecord>,
    pub raw_count: usize,
}

pub struct ReviewPageParser {
    container: SelectorChain,
    date: SelectorChain,
    text: SelectorChain,
    item: SelectorChain,
    rating: SelectorChain,
}

impl ReviewPageParser {
    pub fn with_config(selectors: &ReviewSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container: SelectorChain::compile("review.container", &selectors.container)?,
            date: SelectorChain::compile("review.date", &selectors.date)?,
            text: SelectorChain::compile("review.text", &selectors.text)?,
            item: SelectorChain::compile("review.item", &selectors.item)?,
            rating: SelectorChain::compile("review.rating", &selectors.rating)?,
        })
    }

    fn extract_review(&self, node: ElementRef<'_>, context: &ParseContext) -> ReviewRecord {
        let date_raw = self.date.first(node).map(compact_text);
        let month = date_raw
            .as_deref()
            .map(|raw| month_token(raw, context.today));

        ReviewRecord {
            date_raw: date_raw.unwrap_or_default(),
            month,
            stars: self.rating.first(node).map(stars_in).unwrap_or(0),
            item: self.item.first(node).map(compact_text),
            text: self.text.first(node).map(compact_text),
        }
    }
}

impl ContextualParser for ReviewPageParser {
    type Output = ReviewPage;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ReviewPage {
        let nodes = self.container.all_in(html);
        ReviewPage {
            raw_count: nodes.len(),
            records: nodes
                .into_iter()
                .map(|node| self.extract_review(node, context))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn context() -> ParseContext {
        ParseContext::new("https://funpay.com")
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_review_fields() {
        let parser = ReviewPageParser::with_config(&ReviewSelectors::default()).unwrap();
        let page = parser.parse_document(
            r#"
            <div class="review-item">
              <div class="review-item-user">
                <div class="review-item-date">В этом месяце</div>
                <div class="review-item-rating"><div class="rating"><div class="rating5"></div></div></div>
              </div>
              <div class="review-item-detail">Gold 1000, 500 ₽</div>
              <div class="review-item-text"> Fast, thanks </div>
            </div>
            <div class="review-item">
              <div class="review-item-date">12 мая 2024</div>
            </div>
            "#,
            &context(),
        );

        assert_eq!(page.raw_count, 2);
        let first = &page.records[0];
        assert_eq!(first.date_raw, "В этом месяце");
        assert_eq!(first.month.as_deref(), Some("Окт 2026"));
        assert_eq!(first.stars, 5);
        assert_eq!(first.item.as_deref(), Some("Gold 1000, 500 ₽"));
        assert_eq!(first.text.as_deref(), Some("Fast, thanks"));

        let second = &page.records[1];
        assert_eq!(second.month.as_deref(), Some("Май 2024"));
        assert_eq!(second.stars, 0);
        assert_eq!(second.item, None);
        assert_eq!(second.text, None);
    }

    #[test]
    fn test_review_without_date() {
        let parser = ReviewPageParser::with_config(&ReviewSelectors::default()).unwrap();
        let page = parser.parse_document(
            r#"<div class="review-item"><div class="review-item-text">ok</div></div>"#,
            &context(),
        );
        assert_eq!(page.records[0].date_raw, "");
        assert_eq!(page.records[0].month, None);
    }
}
