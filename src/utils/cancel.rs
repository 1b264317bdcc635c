//! Cancellation utilities
//!
//! Provides a first-class cancellation handle for long-running generation
//! calls. Cancelling stops the local poll loop; it never reaches the remote
//! service, so an in-flight operation keeps running server-side.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::VeoError;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Any call observing this handle resolves with
    /// [`VeoError::Cancelled`] at its next suspend point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Run `future` unless cancellation wins the race.
    pub async fn run<F, T>(&self, future: F) -> Result<T, VeoError>
    where
        F: Future<Output = Result<T, VeoError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(VeoError::Cancelled),
            res = future => res,
        }
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::new()
}
