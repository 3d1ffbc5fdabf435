use crate::config::types::{SeedInput, Settings};
use crate::config::validation::{validate, validate_seed_input};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to load, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ebay_scraper::config::load_settings;
///
/// let settings = load_settings(Path::new("config/settings.toml")).unwrap();
/// println!("Max items: {}", settings.input.max_items);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parses and validates settings from TOML text
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    validate(&settings)?;
    Ok(settings)
}

/// Computes a SHA-256 hash of the settings file content
///
/// The hash is logged at startup so exported files can be traced back to the
/// settings that produced them.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_settings_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads settings and returns both the settings and their hash
pub fn load_settings_with_hash(path: &Path) -> Result<(Settings, String), ConfigError> {
    let settings = load_settings(path)?;
    let hash = compute_settings_hash(path)?;
    Ok((settings, hash))
}

/// Loads the seed input JSON (`{"urls": [...], "keywords": [...]}`)
///
/// At least one non-blank URL or keyword is required.
pub fn load_seed_input(path: &Path) -> Result<SeedInput, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let input: SeedInput = serde_json::from_str(&content)?;
    validate_seed_input(&input)?;
    Ok(input)
}
