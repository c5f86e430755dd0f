//! In-memory status mirror
//!
//! Records every write instead of sending it anywhere. Can be told to fail,
//! or to hold back writes of one status, so callers can observe how upstream
//! errors and slow writes are handled.

use std::time::Duration;

use async_trait::async_trait;
use beacon_core::{DeviceStatus, DomainError, MirrorPath, MirrorResult, StatusMirror, StatusPayload};
use parking_lot::Mutex;
use tokio::sync::watch;

/// One recorded write
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorWrite {
    pub path: String,
    pub payload: StatusPayload,
}

/// Status mirror that keeps writes in process
pub struct MemoryMirror {
    writes: Mutex<Vec<MirrorWrite>>,
    failure: Mutex<Option<String>>,
    latency: Mutex<Option<(DeviceStatus, Duration)>>,
    count: watch::Sender<usize>,
}

impl Default for MemoryMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMirror {
    #[must_use]
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            writes: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            latency: Mutex::new(None),
            count,
        }
    }

    /// Make every following write fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// Accept writes again
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Hold every write of `status` for `delay` before recording it
    pub fn delay_status(&self, status: DeviceStatus, delay: Duration) {
        *self.latency.lock() = Some((status, delay));
    }

    /// All successful writes, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<MirrorWrite> {
        self.writes.lock().clone()
    }

    /// Number of successful writes so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent status written at `path`
    #[must_use]
    pub fn status_at(&self, path: &str) -> Option<DeviceStatus> {
        self.writes
            .lock()
            .iter()
            .rev()
            .find(|w| w.path == path)
            .map(|w| w.payload.status)
    }

    /// Wait until at least `count` writes have been recorded
    pub async fn wait_for_writes(&self, count: usize) {
        let mut rx = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n >= count).await;
    }
}

#[async_trait]
impl StatusMirror for MemoryMirror {
    async fn set(&self, path: &MirrorPath, payload: &StatusPayload) -> MirrorResult<()> {
        if let Some(message) = self.failure.lock().clone() {
            return Err(DomainError::UpstreamWrite(message));
        }

        let latency = *self.latency.lock();
        if let Some((_, delay)) = latency.filter(|(status, _)| *status == payload.status) {
            tokio::time::sleep(delay).await;
        }

        let len = {
            let mut writes = self.writes.lock();
            writes.push(MirrorWrite {
                path: path.to_string(),
                payload: *payload,
            });
            writes.len()
        };
        self.count.send_replace(len);

        Ok(())
    }
}
