//! Data models shared by the fetcher and the responder
//!
//! `CachedResource` is the value carried on the wire and in the cache;
//! the response DTOs cover the responder's auxiliary endpoints.

pub mod resource;
pub mod responses;

pub use resource::{CachedResource, TEST_RESOURCE_KEY};
pub use responses::{ErrorResponse, HealthResponse};
