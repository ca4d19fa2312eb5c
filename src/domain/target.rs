//! Analysis target resolution
//!
//! A target is whatever the caller typed: a bare numeric id, a category URL,
//! a seller profile URL or a link to a single lot.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static USER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"users/(\d+)/").expect("valid user id regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("URL not specified")]
    Empty,

    #[error("invalid seller link: {target}")]
    MalformedSeller { target: String },
}

/// What a (normalized) target URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Category(String),
    Seller(String),
    /// Single lot page; analysed through its owning seller
    LotDetail(String),
}

impl TargetKind {
    /// Classify a caller supplied target.
    ///
    /// Bare digits name a category (`<base>/lots/<id>/`).
    pub fn classify(target: &str, base_url: &str) -> Result<Self, TargetError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(TargetError::Empty);
        }
        let url = if target.chars().all(|c| c.is_ascii_digit()) {
            format!("{}/lots/{}/", base_url.trim_end_matches('/'), target)
        } else {
            target.to_string()
        };
        Ok(Self::classify_url(url))
    }

    /// Classify an already absolute URL
    pub fn classify_url(url: String) -> Self {
        if url.contains("/lots/offer") || url.contains("?id=") {
            TargetKind::LotDetail(url)
        } else if url.contains("/users/") {
            TargetKind::Seller(url)
        } else {
            TargetKind::Category(url)
        }
    }
}

/// Resolve a seller target (raw numeric id or profile URL) to its user id
pub fn resolve_user_id(target: &str) -> Result<u64, TargetError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(TargetError::Empty);
    }
    if target.chars().all(|c| c.is_ascii_digit()) {
        return target
            .parse()
            .map_err(|_| TargetError::MalformedSeller {
                target: target.to_string(),
            });
    }
    USER_ID_RE
        .captures(target)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| TargetError::MalformedSeller {
            target: target.to_string(),
        })
}
