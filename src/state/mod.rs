//! State module for tracking crawl progress
//!
//! This module provides state management for seed URLs during a scrape run.
//!
//! # Components
//!
//! - `CrawlState`: Where the page cursor of one seed URL currently is
//! - `SeedOutcome`: Why a seed URL stopped producing records
//! - `ItemBudget`: The global item cap shared across all seed URLs

mod crawl_state;
mod item_budget;

// Re-export main types
pub use crawl_state::{CrawlState, SeedOutcome};
pub use item_budget::ItemBudget;
