//! Category aggregation
//!
//! Folds the listings of one category into seller summaries, overall price
//! statistics, a price histogram and the least contested price niches.

use indexmap::IndexMap;

use super::dto::CategoryReport;
use crate::domain::{Listing, MarketNiche, PriceBucket, SellerSummary, entities::round2};
use crate::infrastructure::config::AnalysisSettings;

/// Aggregate listings into a [`CategoryReport`]
pub fn aggregate_category(listings: Vec<Listing>, settings: &AnalysisSettings) -> CategoryReport {
    let mut sellers: IndexMap<String, SellerSummary> = IndexMap::new();
    for listing in &listings {
        match sellers.get_mut(&listing.seller) {
            Some(summary) => summary.absorb(listing),
            None => {
                sellers.insert(listing.seller.clone(), SellerSummary::from_first(listing));
            }
        }
    }

    let prices: Vec<f64> = listings
        .iter()
        .map(|listing| listing.price)
        .filter(|price| *price > 0.0)
        .collect();

    let buckets = price_buckets(&prices, settings.histogram_buckets);
    let opportunities = find_market_opportunities(&buckets, settings.niche_count);

    let online_sellers = sellers.values().filter(|s| s.online).count();
    let total_sellers = sellers.len();

    let mut top_sellers: Vec<SellerSummary> = sellers.into_values().collect();
    // Stable: equal review counts stay in discovery order
    top_sellers.sort_by(|a, b| b.reviews.cmp(&a.reviews));
    top_sellers.truncate(settings.top_sellers_limit);

    let stats = PriceStats::of(&prices);

    CategoryReport {
        total_lots: listings.len(),
        total_sellers,
        online_sellers,
        price_min: stats.min,
        price_max: stats.max,
        price_avg: stats.avg,
        price_median: stats.median,
        top_sellers,
        all_lots: listings,
        price_buckets: buckets,
        market_opportunities: opportunities,
    }
}

/// Overall statistics over positive prices, all zero when there are none
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PriceStats {
    min: f64,
    max: f64,
    avg: f64,
    median: f64,
}

impl PriceStats {
    fn of(prices: &[f64]) -> Self {
        if prices.is_empty() {
            return Self::default();
        }
        let mut sorted = prices.to_vec();
        sorted.sort_by(f64::total_cmp);
        let sum: f64 = sorted.iter().sum();
        Self {
            min: round2(sorted[0]),
            max: round2(sorted[sorted.len() - 1]),
            avg: round2(sum / sorted.len() as f64),
            // Upper median: sorted[len / 2]
            median: round2(sorted[sorted.len() / 2]),
        }
    }
}

/// Partition `[min, max]` of `prices` into `buckets` equal-width intervals.
///
/// Every bucket is `[lo, hi)` except the last, which is closed. When all
/// prices are equal a single bucket holds them all.
pub fn price_buckets(prices: &[f64], buckets: usize) -> Vec<PriceBucket> {
    if prices.is_empty() {
        return Vec::new();
    }
    let buckets = buckets.max(1);
    let mn = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let mx = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if mn == mx {
        return vec![PriceBucket {
            range: format!("{:.0}", mn),
            count: prices.len(),
            lo: round2(mn),
            hi: round2(mn),
        }];
    }

    let step = (mx - mn) / buckets as f64;
    let mut counts = vec![0usize; buckets];
    for price in prices {
        let index = (((price - mn) / step).floor() as usize).min(buckets - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = mn + i as f64 * step;
            let hi = mn + (i + 1) as f64 * step;
            PriceBucket {
                range: format!("{:.0}–{:.0}", lo, hi),
                count,
                lo: round2(lo),
                hi: round2(hi),
            }
        })
        .collect()
}

/// The `limit` least populated non-empty buckets, ascending by count.
///
/// Ties keep histogram order.
pub fn find_market_opportunities(buckets: &[PriceBucket], limit: usize) -> Vec<MarketNiche> {
    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut niches: Vec<MarketNiche> = buckets
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| MarketNiche {
            range: bucket.range.clone(),
            count: bucket.count,
            competition_pct: (bucket.count as f64 / max_count as f64 * 100.0).round() as u32,
            recommended_price: round2(bucket.midpoint()),
        })
        .collect();

    niches.sort_by_key(|niche| niche.count);
    niches.truncate(limit);
    niches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn listing(seller: &str, price: f64, reviews: u64, online: bool) -> Listing {
        Listing {
            seller: seller.to_string(),
            title: format!("lot {}", price),
            price,
            reviews,
            online,
            url: format!("https://funpay.com/lots/offer?id={}", price as u64),
        }
    }

    #[test]
    fn test_end_to_end_statistics() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let sellers = ["a", "b", "c"];
        let listings: Vec<Listing> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| listing(sellers[i % 3], *p, 10, i == 0))
            .collect();

        let report = aggregate_category(listings, &AnalysisSettings::default());

        assert_eq!(report.total_lots, 10);
        assert_eq!(report.total_sellers, 3);
        assert_eq!(report.online_sellers, 1);
        assert_eq!(report.price_min, 10.0);
        assert_eq!(report.price_max, 100.0);
        assert_eq!(report.price_avg, 55.0);
        assert_eq!(report.price_median, 60.0);
        assert_eq!(report.price_buckets.len(), 8);
        assert_eq!(report.price_buckets.iter().map(|b| b.count).sum::<usize>(), 10);
    }

    #[test]
    fn test_top_sellers_by_reviews_with_stable_ties() {
        let listings = vec![
            listing("low", 10.0, 1, false),
            listing("tie-first", 20.0, 50, false),
            listing("high", 30.0, 900, true),
            listing("tie-second", 40.0, 50, false),
            listing("low", 50.0, 1000, false),
        ];
        let report = aggregate_category(listings, &AnalysisSettings::default());
        let names: Vec<&str> = report.top_sellers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["high", "tie-first", "tie-second", "low"]);
        // first-seen review count, not the later 1000
        assert_eq!(report.top_sellers[3].reviews, 1);
        assert_eq!(report.top_sellers[3].lots_count, 2);
    }

    #[test]
    fn test_zero_prices_excluded_from_stats() {
        let listings = vec![listing("a", 0.0, 0, false), listing("a", 15.0, 0, false)];
        let report = aggregate_category(listings, &AnalysisSettings::default());
        assert_eq!(report.total_lots, 2);
        assert_eq!(report.price_min, 15.0);
        assert_eq!(report.price_avg, 15.0);
        assert_eq!(report.price_buckets.len(), 1);
    }

    #[test]
    fn test_identical_prices_single_bucket() {
        let buckets = price_buckets(&[5.0, 5.0, 5.0], 8);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].range, "5");

        let niches = find_market_opportunities(&buckets, 3);
        assert_eq!(niches[0].competition_pct, 100);
        assert_eq!(niches[0].recommended_price, 5.0);
    }

    #[test]
    fn test_no_prices() {
        assert!(price_buckets(&[], 8).is_empty());
        assert!(find_market_opportunities(&[], 3).is_empty());
        let report = aggregate_category(vec![listing("a", 0.0, 0, false)], &AnalysisSettings::default());
        assert_eq!(report.price_median, 0.0);
        assert!(report.market_opportunities.is_empty());
    }

    #[test]
    fn test_niches_lowest_counts_first() {
        let prices = [1.0, 1.0, 1.0, 1.0, 5.0, 5.0, 9.0];
        let buckets = price_buckets(&prices, 4);
        // [1,3) = 4, [3,5) = 0, [5,7) = 2, [7,9] = 1
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), [4, 0, 2, 1]);

        let niches = find_market_opportunities(&buckets, 3);
        assert_eq!(niches.iter().map(|n| n.count).collect::<Vec<_>>(), [1, 2, 4]);
        assert_eq!(niches[0].competition_pct, 25);
        assert_eq!(niches[1].competition_pct, 50);
        assert_eq!(niches[0].recommended_price, 8.0);
    }

    proptest! {
        #[test]
        fn prop_buckets_partition_prices(
            prices in prop::collection::vec(0.01f64..100_000.0, 1..200),
            n in 1usize..16,
        ) {
            let buckets = price_buckets(&prices, n);
            prop_assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), prices.len());
            prop_assert!(buckets.len() == n || buckets.len() == 1);
            for pair in buckets.windows(2) {
                prop_assert!(pair[0].hi <= pair[1].lo + 0.011);
            }
        }

        #[test]
        fn prop_niches_are_the_least_populated(
            prices in prop::collection::vec(1.0f64..1000.0, 1..100),
        ) {
            let buckets = price_buckets(&prices, 8);
            let niches = find_market_opportunities(&buckets, 3);
            prop_assert!(niches.len() <= 3);
            prop_assert!(niches.iter().all(|n| n.count > 0));
            prop_assert!(niches.windows(2).all(|w| w[0].count <= w[1].count));

            let mut populated: Vec<usize> = buckets.iter().map(|b| b.count).filter(|c| *c > 0).collect();
            populated.sort_unstable();
            populated.truncate(3);
            prop_assert_eq!(niches.iter().map(|n| n.count).collect::<Vec<_>>(), populated);
        }
    }
}
