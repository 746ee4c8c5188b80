//! Cache Aside demo
//!
//! Starts the static responder, then reads its resource three times through
//! a cache-aside fetcher: the first read misses and populates the memory
//! store, the following reads are served from the cache.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_aside::{
    spawn_cleanup_task, Config, FetchContext, Fetcher, HttpRemote, MemoryStore, Responder,
    ResponderState,
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_aside=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        port = config.server_port,
        base_url = %config.base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        max_entries = config.max_entries,
        "configuration loaded"
    );

    let responder_state = ResponderState::default()
        .with_span(info_span!("responder", port = config.server_port));
    let responder = Responder::start(config.server_port, responder_state)
        .await
        .context("failed to start server")?;

    let store = MemoryStore::from_config(&config);
    let cleanup_handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);

    let remote = HttpRemote::from_config(&config)
        .context("failed to create http client")?
        .with_span(info_span!("remote", base_url = %config.base_url));

    let fetcher = Fetcher::from_config(&config, Arc::new(store.clone()), Arc::new(remote))
        .with_span(info_span!("fetcher", store = "memory"));

    let ctx = FetchContext::background().with_timeout(config.request_timeout * 3);

    // cache miss
    let first = fetcher
        .get_test(&ctx)
        .await
        .context("failed to get test")?;
    println!("request 1 {:?}", first);

    tokio::time::sleep(Duration::from_secs(1)).await;

    // cache hits
    for n in 2..=3 {
        let ctx = FetchContext::background().with_timeout(config.request_timeout);
        let res = fetcher
            .get_test(&ctx)
            .await
            .context("failed to get test")?;
        println!("request {} {:?}", n, res);
    }

    let stats = store.stats().await;
    info!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        "cache statistics"
    );

    cleanup_handle.abort();
    tokio::time::timeout(SHUTDOWN_TIMEOUT, responder.stop())
        .await
        .context("responder did not shut down in time")?
        .context("could not shutdown http server")?;

    Ok(())
}
