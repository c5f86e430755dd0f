//! Cancellable delayed tasks

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Handle to a pending expiry
///
/// The expiry runs on its own tokio task after `delay`. Dropping the handle
/// does not cancel it; call [`cancel`](Self::cancel).
#[derive(Debug)]
pub(crate) struct ExpiryTimer {
    handle: AbortHandle,
}

impl ExpiryTimer {
    /// Run `on_expiry` after `delay` unless cancelled first
    pub(crate) fn spawn<F>(delay: Duration, on_expiry: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_expiry.await;
        });

        Self {
            handle: task.abort_handle(),
        }
    }

    /// Stop the timer. Has no effect once the expiry has completed.
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}
