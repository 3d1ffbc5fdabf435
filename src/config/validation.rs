use crate::config::types::{HttpSettings, InputSettings, ProxySettings, SeedInput, Settings};
use crate::ConfigError;
use url::Url;

/// Proxy URL schemes the HTTP client understands
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Validates the entire settings structure
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_input_settings(&settings.input)?;
    validate_http_settings(&settings.http)?;
    validate_proxy_settings(&settings.proxies)?;
    Ok(())
}

/// Validates crawl behavior settings
fn validate_input_settings(input: &InputSettings) -> Result<(), ConfigError> {
    if !input.delay_seconds.is_finite() || input.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a non-negative number, got {}",
            input.delay_seconds
        )));
    }

    if input.region.trim().is_empty() {
        return Err(ConfigError::Validation("region cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_settings(http: &HttpSettings) -> Result<(), ConfigError> {
    if http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if http.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            http.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates every configured proxy endpoint
///
/// Blank entries are ignored, matching the proxy rotator.
fn validate_proxy_settings(proxies: &ProxySettings) -> Result<(), ConfigError> {
    let endpoints = proxies
        .pool
        .iter()
        .chain(proxies.single.iter())
        .map(|p| p.trim())
        .filter(|p| !p.is_empty());

    for proxy in endpoints {
        validate_proxy_url(proxy)?;
    }
    Ok(())
}

/// Validates one proxy URL
pub fn validate_proxy_url(proxy: &str) -> Result<(), ConfigError> {
    let url = Url::parse(proxy)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy, e)))?;

    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy URL '{}' must use one of {:?}",
            proxy, PROXY_SCHEMES
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy URL '{}' has no host",
            proxy
        )));
    }

    Ok(())
}

/// Validates the seed input: at least one URL or keyword
pub fn validate_seed_input(input: &SeedInput) -> Result<(), ConfigError> {
    if input.is_empty() {
        return Err(ConfigError::Validation(
            "Provide at least one URL or keyword in the input file".to_string(),
        ));
    }
    Ok(())
}
