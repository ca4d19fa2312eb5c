//! Seller aggregation
//!
//! Combines a seller's profile fields with their paginated reviews: what they
//! sell most, when buyers reviewed them, how many stars they got and a sample
//! of review texts.

use super::dto::{MonthCount, ReportType, ReviewSample, SellerReport, StarCount, TopSoldItem};
use crate::domain::{OrderedTally, ReviewRecord, SellerProfile};
use crate::infrastructure::config::AnalysisSettings;

/// Aggregate a profile and its reviews into a [`SellerReport`]
pub fn aggregate_seller(
    profile: SellerProfile,
    reviews: &[ReviewRecord],
    settings: &AnalysisSettings,
) -> SellerReport {
    let mut items: OrderedTally<String> = OrderedTally::new();
    let mut months: OrderedTally<String> = OrderedTally::new();
    // Index 0 counts reviews whose stars could not be determined
    let mut stars = [0usize; 6];
    let mut review_texts = Vec::new();

    for review in reviews {
        if let Some(item) = review.item.as_deref().filter(|item| !item.is_empty()) {
            items.add(item.to_string());
        }
        if let Some(month) = &review.month {
            months.add(month.clone());
        }
        if let Some(slot) = stars.get_mut(usize::from(review.stars)) {
            *slot += 1;
        }

        if review_texts.len() < settings.review_text_limit {
            if let Some(text) = review.text.as_deref().filter(|text| !text.is_empty()) {
                review_texts.push(ReviewSample {
                    text: text.to_string(),
                    stars: review.stars,
                    date: review.date_raw.clone(),
                    item: review.item.clone().unwrap_or_default(),
                });
            }
        }
    }

    let top_sold_items = items
        .most_common(settings.top_items_limit)
        .into_iter()
        .map(|(title, count)| TopSoldItem { title, count })
        .collect();

    // Reviews arrive newest first; reversing first-seen order gives oldest first
    let mut sales_by_month: Vec<MonthCount> = months
        .in_order()
        .map(|(month, count)| MonthCount {
            month: month.clone(),
            count,
        })
        .collect();
    sales_by_month.reverse();

    let rating_dist = if reviews.is_empty() {
        Vec::new()
    } else {
        (1..=5u8)
            .map(|star| StarCount {
                stars: star,
                count: stars[usize::from(star)],
            })
            .collect()
    };

    SellerReport {
        report_type: ReportType::Seller,
        name: profile.name,
        user_id: profile.user_id,
        total_reviews: profile.total_reviews,
        rating: profile.rating,
        lots_count: profile.lots.len(),
        online: profile.online,
        lots: profile.lots,
        top_sold_items,
        sales_by_month,
        rating_dist,
        review_texts,
        reviews_parsed: reviews.len(),
    }
}
