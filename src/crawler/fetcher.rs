//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent, timeout and proxy
//! - GET requests with bounded retry on transient failures
//! - Status classification
//! - Decoding the response body with the declared or sniffed charset

use crate::config::HttpSettings;
use crate::crawler::retry::{retry_with_backoff, RetryPolicy};
use crate::FetchError;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::{Client, Proxy};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::Duration;

/// Bytes inspected for a `<meta>` charset declaration
const SNIFF_LIMIT: usize = 1024;

/// Upper bound for the TCP/TLS connect phase
const MAX_CONNECT_TIMEOUT_SECS: u64 = 10;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.-]+)"#)
        .expect("valid meta charset regex")
});

/// Anything that can produce the HTML of a page
///
/// The crawler only talks to this trait, so tests can serve canned pages
/// without a network.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url`, optionally through `proxy`, and returns the body text
    async fn fetch_page(&self, url: &str, proxy: Option<&str>) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `settings` - User agent and timeout settings
/// * `proxy` - Proxy URL routing every request of this client, if any
///
/// # Example
///
/// ```no_run
/// use ebay_scraper::config::HttpSettings;
/// use ebay_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&HttpSettings::default(), None).unwrap();
/// ```
pub fn build_http_client(settings: &HttpSettings, proxy: Option<&str>) -> Result<Client, FetchError> {
    let timeout = settings.timeout_seconds.max(1);

    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(timeout.min(MAX_CONNECT_TIMEOUT_SECS)))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        let endpoint = Proxy::all(proxy).map_err(|source| FetchError::Proxy {
            proxy: proxy.to_string(),
            source,
        })?;
        builder = builder.proxy(endpoint);
    }

    builder.build().map_err(FetchError::Client)
}

/// The real network page source
///
/// One client is built per distinct proxy endpoint, plus one for direct
/// connections, and reused for every later request through it.
#[derive(Debug)]
pub struct HttpFetcher {
    settings: HttpSettings,
    retry: RetryPolicy,
    clients: Mutex<HashMap<Option<String>, Client>>,
}

impl HttpFetcher {
    pub fn new(settings: HttpSettings) -> Self {
        Self {
            settings,
            retry: RetryPolicy::default(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the default retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the client for `proxy` ahead of the first request
    pub fn prepare(&self, proxy: Option<&str>) -> Result<(), FetchError> {
        self.client_for(proxy).map(|_| ())
    }

    /// Returns the cached client for `proxy`, building it on first use
    fn client_for(&self, proxy: Option<&str>) -> Result<Client, FetchError> {
        let key = proxy.map(str::to_string);
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        let client = build_http_client(&self.settings, proxy)?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &str, proxy: Option<&str>) -> Result<String, FetchError> {
        let client = self.client_for(proxy)?;
        tracing::debug!(url, proxied = proxy.is_some(), "Fetching page");

        retry_with_backoff(self.retry, || fetch_once(&client, url)).await
    }
}

/// One GET attempt
///
/// 2xx and 3xx final statuses are accepted; anything else becomes
/// [`FetchError::Status`] and is left to the retry layer to classify.
async fn fetch_once(client: &Client, url: &str) -> Result<String, FetchError> {
    let network = |source| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(network)?;
    let status = response.status();

    if !(status.is_success() || status.is_redirection()) {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.bytes().await.map_err(network)?;
    Ok(decode_html(&body, content_type.as_deref()))
}

/// Decodes a response body to text
///
/// The charset comes from the `Content-Type` header, else from a `<meta>`
/// declaration in the first kilobyte. Unknown or missing charsets decode as
/// UTF-8; malformed sequences are replaced, never rejected.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(body))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::trace!(encoding = encoding.name(), "Body contained malformed sequences");
    }
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LIMIT)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
