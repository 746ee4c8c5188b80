//! Cache-Aside Fetcher
//!
//! Serves a resource from the key-value store when present, otherwise
//! fetches it from the remote, decodes it and writes it back with a fixed TTL.
//!
//! Per call: `LOOKUP -> hit: return | miss: FETCH -> DECODE -> STORE -> return`.
//! Any failure after the lookup ends the call with an error and nothing is
//! cached. There is no retry and no coalescing of concurrent misses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn, Instrument, Span};

use crate::cache::KeyValueStore;
use crate::codec;
use crate::config::Config;
use crate::context::{FetchContext, Step};
use crate::error::FetchError;
use crate::models::{CachedResource, TEST_RESOURCE_KEY};
use crate::remote::RemoteFetch;

/// Lifetime of entries written after a miss unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache-aside reader shared by any number of concurrent callers.
pub struct Fetcher {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteFetch>,
    ttl: Duration,
    /// Resource key -> remote path
    routes: HashMap<String, String>,
    span: Span,
}

impl Fetcher {
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteFetch>) -> Self {
        let mut routes = HashMap::new();
        routes.insert(TEST_RESOURCE_KEY.to_string(), "/test".to_string());

        Self {
            store,
            remote,
            ttl: DEFAULT_TTL,
            routes,
            span: Span::none(),
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteFetch>,
    ) -> Self {
        Self::new(store, remote).with_ttl(config.cache_ttl)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Maps `key` to a remote `path`, replacing any existing route.
    pub fn with_route(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(key.into(), path.into());
        self
    }

    /// Scopes this fetcher's log events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Remote path for `key`; unrouted keys map to `/<key>`.
    pub fn path_for(&self, key: &str) -> String {
        self.routes
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("/{}", key.trim_start_matches('/')))
    }

    /// Fetches the demo resource.
    pub async fn get_test(&self, ctx: &FetchContext) -> Result<CachedResource, FetchError> {
        self.fetch(ctx, TEST_RESOURCE_KEY).await
    }

    // == Fetch ==
    /// Returns the current value for `key`, preferring the cached copy.
    ///
    /// A store lookup failure counts as a miss. A store write failure after a
    /// successful fetch is returned as `FetchError::CacheWrite`.
    pub async fn fetch(&self, ctx: &FetchContext, key: &str) -> Result<CachedResource, FetchError> {
        self.fetch_through(ctx, key)
            .instrument(self.span.clone())
            .await
    }

    async fn fetch_through(
        &self,
        ctx: &FetchContext,
        key: &str,
    ) -> Result<CachedResource, FetchError> {
        if let Some(cached) = self.lookup(ctx, key).await? {
            info!(key, "cache hit");
            return Ok(cached);
        }

        let path = self.path_for(key);
        debug!(key, %path, "cache miss");

        let response = ctx.run(Step::Fetch, self.remote.fetch(&path)).await??;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                path,
            });
        }

        let resource = codec::decode(&response.body)?;
        let encoded = codec::encode(&resource)?;

        ctx.run(Step::Store, self.store.set(key, encoded, Some(self.ttl)))
            .await?
            .map_err(|source| FetchError::CacheWrite {
                key: key.to_string(),
                source,
            })?;

        info!(
            key,
            items = resource.items.len(),
            ttl_secs = self.ttl.as_secs(),
            "cache populated"
        );
        Ok(resource)
    }

    // == Lookup ==
    /// Store errors and undecodable entries read as a miss; cancellation does not.
    async fn lookup(
        &self,
        ctx: &FetchContext,
        key: &str,
    ) -> Result<Option<CachedResource>, FetchError> {
        match ctx.run(Step::Lookup, self.store.get(key)).await? {
            Ok(Some(bytes)) => match codec::decode(&bytes) {
                Ok(resource) => Ok(Some(resource)),
                Err(err) => {
                    warn!(key, error = %err, "discarding undecodable cache entry");
                    Ok(None)
                }
            },
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(
                    key,
                    store = self.store.store_type(),
                    error = %err,
                    "cache lookup failed, treating as miss"
                );
                Ok(None)
            }
        }
    }

    // == Invalidate ==
    /// Drops the local entry for `key` so the next fetch goes to the remote.
    ///
    /// Returns whether an entry was removed.
    pub async fn invalidate(&self, ctx: &FetchContext, key: &str) -> Result<bool, FetchError> {
        let removed = ctx
            .run(Step::Store, self.store.delete(key))
            .await?
            .map_err(|source| FetchError::CacheWrite {
                key: key.to_string(),
                source,
            })?;

        self.span
            .in_scope(|| debug!(key, removed, "cache entry invalidated"));
        Ok(removed)
    }
}
