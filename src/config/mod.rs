//! Configuration module for ebay-scraper
//!
//! This module handles loading, parsing, and validating the TOML settings file
//! and the JSON seed input file.
//!
//! # Example
//!
//! ```no_run
//! use ebay_scraper::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("config/settings.toml")).unwrap();
//! println!("Scraping at most {} items", settings.input.max_items);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    HttpSettings, InputSettings, ProxySettings, SeedInput, Settings, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    compute_settings_hash, load_seed_input, load_settings, load_settings_with_hash,
    parse_settings,
};
pub use validation::validate_proxy_url;
