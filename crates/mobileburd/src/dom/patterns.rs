// ABOUTME: Compiled href pattern cache for repeated regex matching against scraped attributes.
// ABOUTME: Patterns are compiled once per process and shared read-mostly between requests.

//! Regex caching for href pattern queries.
//!
//! The extractors query the same handful of href fragments on every page.
//! Compiling them once and cloning the compiled `Regex` (an `Arc` internally)
//! keeps each extraction pass free of regex construction.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;

static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a pattern, caching the result.
///
/// Returns `None` for an invalid pattern; the failure is cached as well.
pub fn get_or_compile(pattern: &str) -> Option<Regex> {
    {
        let cache = PATTERN_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(pattern) {
            return cached.clone();
        }
    }

    let compiled = match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "invalid href pattern");
            None
        }
    };
    let mut cache = PATTERN_CACHE.write().unwrap_or_else(|e| e.into_inner());
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(pattern) {
        return cached.clone();
    }
    cache.insert(pattern.to_string(), compiled.clone());
    compiled
}
