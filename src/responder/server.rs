//! Responder server lifecycle: bind, serve in the background, shut down.

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument, Span};

use super::{create_router, ResponderState};

/// A running responder.
///
/// Dropping it without `stop` also begins a graceful shutdown, but nothing
/// waits for in-flight requests to finish.
#[derive(Debug)]
pub struct Responder {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<()>>,
    span: Span,
}

impl Responder {
    /// Starts serving on all interfaces at `port` (0 picks a free port).
    pub async fn start(port: u16, state: ResponderState) -> io::Result<Self> {
        Self::bind(SocketAddr::from(([0, 0, 0, 0], port)), state).await
    }

    pub async fn bind(addr: SocketAddr, state: ResponderState) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();
        let span = state.span.clone();
        let app = create_router(state);

        let handle = tokio::spawn(
            async move {
                let served = axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        // A dropped sender also stops the server.
                        let _ = signal.await;
                    })
                    .await;
                if let Err(err) = &served {
                    error!(error = %err, "could not listen and serve");
                }
                served
            }
            .instrument(span.clone()),
        );

        span.in_scope(|| info!(%addr, "responder listening"));
        Ok(Self {
            addr,
            shutdown,
            handle,
            span,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL a client on this host can use to reach the responder.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.addr.port())
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn stop(self) -> io::Result<()> {
        let _ = self.shutdown.send(());
        let result = self
            .handle
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        self.span
            .in_scope(|| info!(addr = %self.addr, "responder stopped"));
        result
    }
}
