//! Cooperative cancellation.
//!
//! One [`CancelHandle`] is held by whoever may abort an export; the pipeline
//! holds the matching [`CancelToken`] and races every suspend point against
//! it.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{ExportError, ExportResult};

/// Sending side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Create a handle and its first token.
    ///
    /// ```
    /// use mesh_export::CancelHandle;
    ///
    /// let (handle, token) = CancelHandle::pair();
    /// assert!(!token.is_cancelled());
    /// handle.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    #[must_use]
    pub fn pair() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelToken { rx: Some(rx) })
    }

    /// Signal cancellation to every token.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Another token observing this handle.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Whether [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiving side of a cancellation signal.
///
/// Dropping the [`CancelHandle`] without cancelling means the token never
/// fires.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    /// A token that is never cancelled.
    #[must_use]
    pub const fn never() -> Self {
        Self { rx: None }
    }

    /// Whether cancellation has been signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Return `Err(Cancelled)` if cancellation has been signalled.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Cancelled`].
    pub fn check(&self) -> ExportResult<()> {
        if self.is_cancelled() {
            Err(ExportError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolve once cancellation is signalled.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|&cancelled| cancelled).await.is_err() {
            // Handle dropped without cancelling.
            std::future::pending::<()>().await;
        }
    }

    /// Run `future` unless cancellation fires first.
    ///
    /// Cancellation is checked before the future is polled and wins ties.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Cancelled`] if the signal fires before the
    /// future completes; the future is dropped.
    pub async fn guard<F: Future>(&self, future: F) -> ExportResult<F::Output> {
        self.check()?;
        tokio::select! {
            biased;
            () = self.cancelled() => Err(ExportError::Cancelled),
            output = future => Ok(output),
        }
    }
}
