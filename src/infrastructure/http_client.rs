//! HTTP client for marketplace fetching with politeness delays and retries
//!
//! This module provides the page fetcher used by the paginator. Every request
//! carries its own [`FetchContext`] (currency cookie and retry policy), so the
//! underlying `reqwest::Client` holds no per-analysis mutable state and one
//! client can serve analyses in different currencies at the same time.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::Currency;
use crate::infrastructure::config::HttpSettings;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("HTTP request failed for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Gave up on {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Politeness and retry policy applied to a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed pause after a failed attempt
    pub pause: Duration,
    /// Bounds of the randomized delay slept before every attempt
    pub politeness_min: Duration,
    pub politeness_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&HttpSettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            pause: settings.retry_pause(),
            politeness_min: Duration::from_millis(settings.politeness_min_ms),
            politeness_max: Duration::from_millis(settings.politeness_max_ms),
        }
    }

    /// No delays at all; for in-process sources and tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            pause: Duration::ZERO,
            politeness_min: Duration::ZERO,
            politeness_max: Duration::ZERO,
        }
    }

    /// Uniformly random delay inside the politeness window
    pub fn politeness_delay(&self) -> Duration {
        let min = self.politeness_min.as_millis() as u64;
        let max = (self.politeness_max.as_millis() as u64).max(min);
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

/// Per-request state: which currency to render prices in and how to retry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    pub currency: Currency,
    pub retry: RetryPolicy,
}

impl FetchContext {
    pub fn new(currency: Currency, retry: RetryPolicy) -> Self {
        Self { currency, retry }
    }
}

/// Anything that can hand out page bodies for a URL.
///
/// Implemented by [`HttpClient`] for the live site and by in-memory sources
/// in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str, currency: Currency) -> FetchResult<String>;
}

/// HTTP client with politeness delay, fixed-pause retries and a per-request currency cookie
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    cookie_name: String,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client from the HTTP settings
    pub fn with_settings(settings: &HttpSettings) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value("accept-language", &settings.accept_language)?);
        headers.insert(ACCEPT, header_value("accept", &settings.accept)?);

        let client = ClientBuilder::new()
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            cookie_name: settings.currency_cookie.clone(),
            retry: RetryPolicy::from_settings(settings),
        })
    }

    /// Override the retry policy (returns self for chaining)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Context for one request in `currency` using this client's retry policy
    pub fn context(&self, currency: Currency) -> FetchContext {
        FetchContext::new(currency, self.retry.clone())
    }

    /// `Cookie` header value selecting the currency
    pub fn currency_cookie(&self, currency: Currency) -> String {
        format!("{}={}", self.cookie_name, currency.code())
    }

    /// Fetch HTML content from a URL with politeness delay and retries
    pub async fn fetch_html(&self, url: &str, context: &FetchContext) -> FetchResult<String> {
        let attempts = context.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let delay = context.retry.politeness_delay();
            debug!("⏳ politeness delay {:?} before {}", delay, url);
            sleep(delay).await;

            match self.fetch_html_once(url, context.currency).await {
                Ok(body) => {
                    debug!("Fetched {} on attempt {} ({} bytes)", url, attempt, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    warn!("Attempt {}/{} failed for {}: {}", attempt, attempts, url, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        sleep(context.retry.pause).await;
                    }
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn fetch_html_once(&self, url: &str, currency: Currency) -> FetchResult<String> {
        info!("🌐 HTTP GET ({}): {}", currency, url);
        let response = self
            .client
            .get(url)
            .header(COOKIE, header_value("cookie", &self.currency_cookie(currency))?)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, url: &str, currency: Currency) -> FetchResult<String> {
        let context = self.context(currency);
        self.fetch_html(url, &context).await
    }
}

fn header_value(name: &'static str, value: &str) -> FetchResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local server answering one connection per scripted status and
    /// recording each raw request head, lowercased
    async fn scripted_server(statuses: Vec<u16>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            for status in statuses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&chunk[..n]),
                    }
                }
                log.lock().unwrap().push(String::from_utf8_lossy(&head).to_lowercase());

                let body = if status == 200 { "<html>ok</html>" } else { "" };
                let response = format!(
                    "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/lots/81/", addr), requests)
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_settings(&HttpSettings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_currency_cookie_per_request() {
        let client = HttpClient::with_settings(&HttpSettings::default()).unwrap();
        assert_eq!(client.currency_cookie(Currency::Usd), "cy=USD");
        assert_eq!(client.context(Currency::Eur).currency, Currency::Eur);
        assert_eq!(client.context(Currency::Rub).currency, Currency::Rub);
    }

    #[test]
    fn test_politeness_delay_within_window() {
        let policy = RetryPolicy::default();
        for _ in 0..200 {
            let delay = policy.politeness_delay();
            assert!(delay >= Duration::from_millis(800));
            assert!(delay <= Duration::from_millis(2000));
        }
        assert_eq!(policy.pause, Duration::from_secs(3));
        assert_eq!(policy.max_attempts, 3);
    }

    #[test]
    fn test_invalid_header_is_reported() {
        let settings = HttpSettings {
            accept_language: "ru\nRU".to_string(),
            ..HttpSettings::default()
        };
        assert!(matches!(
            HttpClient::with_settings(&settings),
            Err(FetchError::InvalidHeader { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_attempts() {
        let client = HttpClient::with_settings(&HttpSettings::default())
            .unwrap()
            .with_retry_policy(RetryPolicy::immediate(2));

        let result = client.fetch_page("http://127.0.0.1:9/lots/1/", Currency::Rub).await;
        match result {
            Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected exhausted fetch, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_success() {
        let (url, requests) = scripted_server(vec![500, 200]).await;
        let client = HttpClient::with_settings(&HttpSettings::default())
            .unwrap()
            .with_retry_policy(RetryPolicy::immediate(3));

        let body = client.fetch_page(&url, Currency::Usd).await.unwrap();
        assert_eq!(body, "<html>ok</html>");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|head| head.contains("cookie: cy=usd")));
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_attempts() {
        let (url, requests) = scripted_server(vec![503, 500]).await;
        let client = HttpClient::with_settings(&HttpSettings::default())
            .unwrap()
            .with_retry_policy(RetryPolicy::immediate(2));

        match client.fetch_page(&url, Currency::Eur).await {
            Err(FetchError::Exhausted { attempts, last_error, .. }) => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("500"));
            }
            other => panic!("expected exhausted fetch, got {:?}", other.map(|b| b.len())),
        }

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|head| head.contains("cookie: cy=eur")));
    }
}
