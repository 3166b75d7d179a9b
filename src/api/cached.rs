use super::client::TvdbClient;
use super::types::{normalize_order, ApiError, Episode, Series};
use crate::cache::{CacheEntry, CacheStore};
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Per-kind cache lifetimes
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub search: Duration,
    pub series: Duration,
    pub episodes: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            search: Duration::days(7),
            series: Duration::days(7),
            episodes: Duration::hours(24),
        }
    }
}

/// Read-through cache over any [`TvdbClient`].
///
/// Callers cannot tell a cached result from a network one; expired or
/// undecodable entries simply fall through to the inner client.
pub struct CachedClient<C> {
    inner: C,
    store: CacheStore,
    ttls: CacheTtls,
}

impl<C: TvdbClient> CachedClient<C> {
    pub fn new(inner: C, store: CacheStore, ttls: CacheTtls) -> Self {
        Self { inner, store, ttls }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.store.get(key)?;
        match serde_json::from_slice(&entry.body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, "Ignoring undecodable cache entry: {}", e);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let body = match serde_json::to_vec(value) {
            Ok(b) => b,
            Err(e) => {
                warn!(key = %key, "Failed to encode cache entry: {}", e);
                return;
            }
        };
        // A failed write must not fail the fetch that produced the data
        if let Err(e) = self.store.put(key, &CacheEntry::new(body, ttl)) {
            warn!(key = %key, "Failed to write cache entry: {}", e);
        }
    }

    fn fetch<T, F>(&mut self, key: &str, ttl: Duration, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut C) -> Result<T, ApiError>,
    {
        if let Some(cached) = self.read(key) {
            debug!(key = %key, "Serving from cache");
            return Ok(cached);
        }

        let value = fetch(&mut self.inner)?;
        self.write(key, &value, ttl);
        Ok(value)
    }
}

impl<C: TvdbClient> TvdbClient for CachedClient<C> {
    fn login(&mut self) -> Result<(), ApiError> {
        self.inner.login()
    }

    fn search_series(&mut self, query: &str, lang: &str) -> Result<Vec<Series>, ApiError> {
        let key = format!("search:{}:{}", lang.to_lowercase(), query.to_lowercase());
        let ttl = self.ttls.search;
        self.fetch(&key, ttl, |inner| inner.search_series(query, lang))
    }

    fn series(&mut self, id: u32, lang: &str) -> Result<Series, ApiError> {
        let key = format!("series:{}:{}", id, lang.to_lowercase());
        let ttl = self.ttls.series;
        self.fetch(&key, ttl, |inner| inner.series(id, lang))
    }

    fn episodes(
        &mut self,
        id: u32,
        order: &str,
        season: Option<u32>,
        lang: &str,
    ) -> Result<Vec<Episode>, ApiError> {
        // Order and season scope the numbering, so both belong in the key
        let key = format!(
            "episodes:{}:{}:{}:{}",
            id,
            normalize_order(order),
            season.unwrap_or(0),
            lang.to_lowercase()
        );
        let ttl = self.ttls.episodes;
        self.fetch(&key, ttl, |inner| inner.episodes(id, order, season, lang))
    }
}
