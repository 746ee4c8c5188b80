//! Remote Fetch Module
//!
//! A single network round-trip for a resource path. Implementations make
//! exactly one attempt; status interpretation is left to the caller.

mod http;

pub use http::HttpRemote;

use async_trait::async_trait;

use crate::error::TransportError;

/// Raw answer from the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only 200 OK carries a complete resource.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait RemoteFetch: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<RemoteResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ok_is_success() {
        assert!(RemoteResponse::new(200, Vec::new()).is_success());
        assert!(!RemoteResponse::new(201, Vec::new()).is_success());
        assert!(!RemoteResponse::new(204, Vec::new()).is_success());
        assert!(!RemoteResponse::new(206, Vec::new()).is_success());
        assert!(!RemoteResponse::new(304, Vec::new()).is_success());
        assert!(!RemoteResponse::new(405, Vec::new()).is_success());
        assert!(!RemoteResponse::new(500, Vec::new()).is_success());
    }
}
