//! Error types for the cache-aside client and its collaborators
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::context::{CancelReason, Step};

// == Store Error Enum ==
/// Errors raised by key-value store implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key not found in the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key or value rejected by the store's limits
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Transport Error ==
/// Network-level failure while talking to the remote resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Base URL and resource path could not be joined
    #[error("could not join url: {0}")]
    InvalidUrl(String),

    /// Client-side request timeout elapsed
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure
    #[error("could not do request: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

// == Format Error ==
/// Payload is not a well-formed resource document.
#[derive(Error, Debug)]
#[error("could not decode response: {0}")]
pub struct FormatError(#[from] pub serde_json::Error);

// == Fetch Error ==
/// Failure of a single cache-aside fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network or connection failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Remote answered with a non-success status
    #[error("unexpected status code {status} for {path}")]
    Status { status: u16, path: String },

    /// Remote payload was malformed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Value was fetched but the store rejected the write
    #[error("could not set cache for '{key}': {source}")]
    CacheWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Context expired or was cancelled mid-operation
    #[error("{step} {reason}")]
    Cancelled { step: Step, reason: CancelReason },
}

// == Responder Error ==
/// Errors returned by the static responder's handlers.
#[derive(Error, Debug)]
pub enum ResponderError {
    /// Resource could not be encoded
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FormatError> for ResponderError {
    fn from(err: FormatError) -> Self {
        ResponderError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ResponderError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ResponderError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
