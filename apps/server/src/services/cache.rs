// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory read cache for backend views.
//!
//! Entries are keyed by view name and hold the last fetched JSON value.
//! Writes are last-write-wins. There is no expiry: pollers overwrite entries
//! and table writes invalidate the views they affect.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::ApiError;

/// A cached value and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub fetched_at: DateTime<Utc>,
}

/// Shared view cache.
#[derive(Debug, Default)]
pub struct ReadCache {
    entries: RwLock<FxHashMap<String, CacheEntry>>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry including its fetch time.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Set a cached value, replacing any previous one.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<DateTime<Utc>, ApiError> {
        let value = serde_json::to_value(value)?;
        let fetched_at = Utc::now();
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry { value, fetched_at });
        tracing::debug!(key = %key, "Cached view");
        Ok(fetched_at)
    }

    /// Drop one entry; returns whether it existed.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = ReadCache::new();
        assert!(cache.entry("overview").await.is_none());

        let first = cache.set("overview", &1u64).await.unwrap();
        let second = cache.set("overview", &2u64).await.unwrap();
        let entry = cache.entry("overview").await.unwrap();
        assert_eq!(entry.value, json!(2));
        assert_eq!(entry.fetched_at, second);
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = ReadCache::new();
        cache.set("a", &"x").await.unwrap();
        cache.set("b", &"y").await.unwrap();

        assert!(cache.invalidate("a").await);
        assert!(!cache.invalidate("a").await);
        assert!(cache.entry("a").await.is_none());
        assert_eq!(cache.entry("b").await.unwrap().value, json!("y"));
    }
}
