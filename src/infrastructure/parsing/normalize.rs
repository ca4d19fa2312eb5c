//! Normalization of rendered marketplace text into typed values
//!
//! All functions here are pure; the current date is passed in where relative
//! dates need a reference.

use chrono::{Datelike, Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;
use url::Url;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid year regex"));
static STAR_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^rating(\d)$").expect("valid rating class regex"));

/// Month name fragments of the site locale, tested in this order
const MONTH_PREFIXES: [(&str, u32); 13] = [
    ("январ", 1),
    ("феврал", 2),
    ("март", 3),
    ("апрел", 4),
    ("май", 5),
    ("мая", 5),
    ("июн", 6),
    ("июл", 7),
    ("август", 8),
    ("сентябр", 9),
    ("октябр", 10),
    ("ноябр", 11),
    ("декабр", 12),
];

const MONTH_SHORT: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

/// Badge words the site renders inside seller name elements
const ONLINE_BADGES: [&str; 2] = ["Онлайн", "онлайн"];

/// Placeholder for listings without a seller element
pub const UNKNOWN_SELLER: &str = "Неизвестно";

/// Price text to number: keep digits, comma and dot, comma becomes dot.
///
/// "1 250,50 ₽" → 1250.5, "—" → 0.0
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or_else(|_| {
        debug!("Unparseable price '{}', using 0.0", raw);
        0.0
    })
}

/// Count text to number: keep digits only, empty → 0
pub fn parse_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or_else(|_| {
        debug!("Unparseable count '{}', using 0", raw);
        0
    })
}

/// Rating text to a value in [0, 5], unparseable → 0.0
pub fn parse_rating(raw: &str) -> f64 {
    match raw.trim().replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, 5.0),
        _ => {
            debug!("Unparseable rating '{}', using 0.0", raw);
            0.0
        }
    }
}

fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_SHORT[date.month0() as usize], date.year())
}

/// Normalize a review date into a "Мес ГГГГ" token relative to `today`.
///
/// Text without a recognizable month is returned unchanged.
pub fn month_token(raw: &str, today: NaiveDate) -> String {
    let s = raw.trim().to_lowercase();

    if s.contains("этом месяце") || s.contains("этот месяц") {
        return month_label(today);
    }
    if s.contains("прошлом месяце") || s.contains("прошлый месяц") {
        let last_of_previous = today.with_day(1).unwrap_or(today) - Duration::days(1);
        return month_label(last_of_previous);
    }
    if s.contains("сегодня") {
        return month_label(today);
    }
    if s.contains("вчера") {
        return month_label(today - Duration::days(1));
    }

    let year = YEAR_RE
        .captures(&s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or_else(|| today.year());

    for (prefix, month) in MONTH_PREFIXES {
        if s.contains(prefix) {
            return format!("{} {}", MONTH_SHORT[(month - 1) as usize], year);
        }
    }

    raw.to_string()
}

/// [`month_token`] against the local calendar date
pub fn month_token_now(raw: &str) -> String {
    month_token(raw, Local::now().date_naive())
}

/// First `ratingN` class with N in 1..=5 among the descendants of a rating
/// container, 0 if none
pub fn stars_in(container: ElementRef<'_>) -> u8 {
    container
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .flat_map(|element| element.value().classes())
        .find_map(|class| {
            STAR_CLASS_RE
                .captures(class)
                .and_then(|caps| caps.get(1))
                .and_then(|digit| digit.as_str().parse::<u8>().ok())
                .filter(|stars| (1..=5).contains(stars))
        })
        .unwrap_or(0)
}

/// Remove the online badge words from a rendered seller name
pub fn strip_online_badge(name: &str) -> String {
    ONLINE_BADGES
        .iter()
        .fold(name.to_string(), |acc, badge| acc.replace(badge, ""))
        .trim()
        .to_string()
}

/// Resolve an `href` against the site root; absolute links are kept as is
pub fn resolve_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) if !href.is_empty() => url.to_string(),
        _ => format!("{}{}", base_url.trim_end_matches('/'), href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use scraper::{Html, Selector};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("1 250,50 ₽", 1250.50)]
    #[case("350 ₽", 350.0)]
    #[case("$12.99", 12.99)]
    #[case("—", 0.0)]
    #[case("", 0.0)]
    #[case("1,250.50", 0.0)]
    #[case("0.5 €", 0.5)]
    fn test_parse_price(#[case] raw: &str, #[case] expected: f64) {
        assert!((parse_price(raw) - expected).abs() < 1e-9, "{raw}");
    }

    #[rstest]
    #[case("Всего 175 056 отзывов", 175_056)]
    #[case("(12)", 12)]
    #[case("нет отзывов", 0)]
    fn test_parse_count(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_count(raw), expected);
    }

    #[rstest]
    #[case("4,8", 4.8)]
    #[case(" 5 ", 5.0)]
    #[case("7.5", 5.0)]
    #[case("n/a", 0.0)]
    fn test_parse_rating(#[case] raw: &str, #[case] expected: f64) {
        assert!((parse_rating(raw) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case("В этом месяце", day(2026, 10, 19), "Окт 2026")]
    #[case("в этом месяце", day(2026, 10, 1), "Окт 2026")]
    #[case("в этом месяце", day(2026, 10, 31), "Окт 2026")]
    #[case("В прошлом месяце", day(2026, 1, 15), "Дек 2025")]
    #[case("Сегодня, 14:02", day(2026, 3, 3), "Мар 2026")]
    #[case("Вчера, 23:59", day(2026, 3, 1), "Фев 2026")]
    #[case("12 мая 2024", day(2026, 10, 19), "Май 2024")]
    #[case("3 сентября", day(2026, 10, 19), "Сен 2026")]
    #[case("Июль 2023", day(2026, 10, 19), "Июл 2023")]
    #[case("2 года назад", day(2026, 10, 19), "2 года назад")]
    fn test_month_token(#[case] raw: &str, #[case] today: NaiveDate, #[case] expected: &str) {
        assert_eq!(month_token(raw, today), expected);
    }

    #[test]
    fn test_this_month_follows_the_clock() {
        let today = Local::now().date_naive();
        assert_eq!(month_token_now("в этом месяце"), month_label(today));
    }

    #[test]
    fn test_stars_from_rating_classes() {
        let html = Html::parse_fragment(
            r#"<div class="review-item-rating"><div class="rating"><div class="rating4"></div></div></div>"#,
        );
        let selector = Selector::parse(".review-item-rating").unwrap();
        let container = html.select(&selector).next().unwrap();
        assert_eq!(stars_in(container), 4);
    }

    #[test]
    fn test_stars_ignore_container_own_class_and_non_matching() {
        let html = Html::parse_fragment(
            r#"<div class="box rating5"><span class="rating-stars"></span><i class="rating10"></i></div>"#,
        );
        let selector = Selector::parse(".box").unwrap();
        let container = html.select(&selector).next().unwrap();
        assert_eq!(stars_in(container), 0);
    }

    #[rstest]
    #[case(r#"<i class="rating7"></i>"#, 0)]
    #[case(r#"<i class="rating9"></i>"#, 0)]
    #[case(r#"<i class="rating0"></i>"#, 0)]
    #[case(r#"<i class="rating7"></i><i class="rating2"></i>"#, 2)]
    fn test_stars_outside_scale_are_undetermined(#[case] inner: &str, #[case] expected: u8) {
        let html = Html::parse_fragment(&format!(r#"<div class="box">{inner}</div>"#));
        let selector = Selector::parse(".box").unwrap();
        let container = html.select(&selector).next().unwrap();
        assert_eq!(stars_in(container), expected);
    }

    #[test]
    fn test_strip_online_badge() {
        assert_eq!(strip_online_badge("Продавец Онлайн"), "Продавец");
        assert_eq!(strip_online_badge(" онлайн Seller "), "Seller");
    }

    #[test]
    fn test_resolve_url() {
        let base = "https://funpay.com";
        assert_eq!(
            resolve_url("/lots/offer?id=5", base),
            "https://funpay.com/lots/offer?id=5"
        );
        assert_eq!(
            resolve_url("https://funpay.com/users/1/", base),
            "https://funpay.com/users/1/"
        );
        assert_eq!(resolve_url("", base), "https://funpay.com");
    }
}
