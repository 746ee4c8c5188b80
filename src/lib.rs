//! Cache Aside - cache-aside reads in front of a remote HTTP resource
//!
//! A `Fetcher` checks a key-value store, falls back to the remote on a miss
//! and writes the decoded value back with a fixed TTL. The crate also ships
//! an in-memory TTL/LRU store and the static responder the remote talks to.

pub mod cache;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod remote;
pub mod responder;
pub mod tasks;

pub use cache::{KeyValueStore, MemoryStore, NoopStore};
pub use config::Config;
pub use context::{CancelHandle, FetchContext};
pub use error::{FetchError, StoreError, TransportError};
pub use fetcher::Fetcher;
pub use models::CachedResource;
pub use remote::{HttpRemote, RemoteFetch, RemoteResponse};
pub use responder::{Responder, ResponderState};
pub use tasks::spawn_cleanup_task;
