//! Proxy endpoint selection

use crate::config::ProxySettings;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out the proxy to use for each request
///
/// A single fixed proxy takes precedence over the pool. With rotation off
/// the first pool entry is always used; otherwise the pool is walked
/// round-robin. The cursor is atomic so concurrent callers still get a fair
/// rotation.
#[derive(Debug, Default)]
pub struct ProxyRotator {
    pool: Vec<String>,
    single: Option<String>,
    rotate: bool,
    cursor: AtomicUsize,
}

impl ProxyRotator {
    pub fn new(pool: Vec<String>, single: Option<String>, rotate: bool) -> Self {
        let clean = |p: String| {
            let p = p.trim().to_string();
            if p.is_empty() {
                None
            } else {
                Some(p)
            }
        };

        Self {
            pool: pool.into_iter().filter_map(clean).collect(),
            single: single.and_then(clean),
            rotate,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn from_settings(settings: &ProxySettings) -> Self {
        Self::new(
            settings.pool.clone(),
            settings.single.clone(),
            settings.rotate,
        )
    }

    /// A rotator that never returns a proxy
    pub fn direct() -> Self {
        Self::default()
    }

    /// Returns the proxy for the next request, or `None` for a direct
    /// connection
    pub fn next(&self) -> Option<&str> {
        if let Some(single) = &self.single {
            return Some(single);
        }

        if self.pool.is_empty() {
            return None;
        }

        if !self.rotate {
            return self.pool.first().map(String::as_str);
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        self.pool.get(index).map(String::as_str)
    }

    /// Every configured endpoint, fixed proxy first
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.single.iter().chain(self.pool.iter()).map(String::as_str)
    }

    pub fn is_direct(&self) -> bool {
        self.single.is_none() && self.pool.is_empty()
    }
}
