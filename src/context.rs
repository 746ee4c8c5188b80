//! Request Context Module
//!
//! Carries a caller-supplied deadline and cancellation signal through every
//! step of a fetch. The same context bounds the store lookup, the remote
//! call and the store write.

use std::fmt;
use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::FetchError;

// == Step ==
/// Stage of a fetch that a context aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Lookup,
    Fetch,
    Store,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Lookup => "lookup",
            Step::Fetch => "fetch",
            Step::Store => "store",
        };
        f.write_str(name)
    }
}

// == Cancel Reason ==
/// Why a context stopped a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    DeadlineExceeded,
    Cancelled,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
            CancelReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

// == Fetch Context ==
/// Deadline and cancellation scope for one or more fetches.
///
/// Cloning a context shares its cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context cloned from the one that created it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl FetchContext {
    /// A context that never expires and cannot be cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Bounds the context to `timeout` from now, keeping any earlier deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bounds the context to `deadline`, keeping any earlier deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attaches a fresh cancellation signal.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[cfg(test)]
    fn is_done(&self) -> bool {
        let cancelled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|at| Instant::now() >= at);
        cancelled || expired
    }

    // == Run ==
    /// Drives `step` to completion unless the context ends first.
    ///
    /// A context that is already done never polls `step`.
    pub async fn run<F, T>(&self, step: Step, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = T>,
    {
        let cancelled = async {
            match &self.cancel {
                Some(rx) => {
                    let mut rx = rx.clone();
                    let sender_gone = rx.wait_for(|flag| *flag).await.is_err();
                    if sender_gone {
                        pending::<()>().await;
                    }
                }
                None => pending::<()>().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(FetchError::Cancelled { step, reason: CancelReason::Cancelled }),
            _ = expired => Err(FetchError::Cancelled { step, reason: CancelReason::DeadlineExceeded }),
            out = fut => Ok(out),
        }
    }
}
