//! HTTP remote backed by reqwest.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, Instrument, Span};

use super::{RemoteFetch, RemoteResponse};
use crate::config::Config;
use crate::error::TransportError;

/// Issues `GET <base_url><path>` for each fetch.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    http: Client,
    base_url: Url,
    span: Span,
}

impl HttpRemote {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(format!(
                "{} cannot be used as a base url",
                base_url
            )));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            span: Span::none(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    /// Scopes this remote's log events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // == Resolve ==
    /// Appends `path` to the base URL's path, keeping any base prefix.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(joined));
        }
        Ok(url)
    }
}

#[async_trait]
impl RemoteFetch for HttpRemote {
    async fn fetch(&self, path: &str) -> Result<RemoteResponse, TransportError> {
        let url = self.resolve(path)?;

        async move {
            let start = Instant::now();
            debug!(%url, "requesting remote resource");

            let response = self.http.get(url.clone()).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();

            debug!(
                %url,
                status,
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "remote responded"
            );

            Ok::<_, TransportError>(RemoteResponse { status, body })
        }
        .instrument(self.span.clone())
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(base: &str) -> HttpRemote {
        HttpRemote::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_resolve_root_base() {
        let url = remote("http://localhost:8080").resolve("/test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/test");
    }

    #[test]
    fn test_resolve_keeps_base_prefix() {
        let url = remote("http://localhost:8080/api/").resolve("/test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/test");

        let url = remote("http://localhost:8080/api").resolve("test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/test");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpRemote::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));

        let result = HttpRemote::new("mailto:someone@example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener to get a port nothing is serving on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let remote = remote(&format!("http://{}", addr));
        let result = remote.fetch("/test").await;

        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
