use serde::Deserialize;

/// Default desktop browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Main settings structure for a scrape run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub http: HttpSettings,
    pub proxies: ProxySettings,
}

/// Crawl behavior settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Two-letter market code selecting the eBay domain
    pub region: String,

    /// Maximum number of records collected across all seed URLs
    #[serde(rename = "max-items")]
    pub max_items: usize,

    /// Pause between network calls (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Fetch every item page to fill in detail fields
    #[serde(rename = "follow-item-page")]
    pub follow_item_page: bool,

    /// Discard cards that yield neither a title nor a URL
    #[serde(rename = "drop-empty-records")]
    pub drop_empty_records: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            region: "US".to_string(),
            max_items: 200,
            delay_seconds: 0.5,
            follow_item_page: false,
            drop_empty_records: false,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 20,
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy endpoints used in round-robin order
    pub pool: Vec<String>,

    /// One fixed proxy; takes precedence over the pool
    pub single: Option<String>,

    /// Rotate through the pool; when false the first entry is always used
    pub rotate: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            pool: Vec::new(),
            single: None,
            rotate: true,
        }
    }
}

/// Seed input: explicit search URLs and/or keywords
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedInput {
    pub urls: Vec<String>,
    pub keywords: Vec<String>,
}

impl SeedInput {
    /// Non-blank seed URLs, in input order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty())
    }

    /// Non-blank keywords, in input order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }

    /// Returns true when neither list holds a usable entry
    pub fn is_empty(&self) -> bool {
        self.urls().next().is_none() && self.keywords().next().is_none()
    }
}
