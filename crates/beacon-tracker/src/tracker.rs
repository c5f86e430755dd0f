//! Presence tracker
//!
//! Owns the active queues and expiry timers of every owner scope.
//!
//! Each start bumps a process-wide generation counter and stores it on the
//! record; the timer armed by that start carries the same number. A timer only
//! reverts the record if the generations still match, so an expiry that was
//! already running when a newer start arrived cannot undo that start.
//!
//! State changes and their mirror writes run under a per-entity lock, so an
//! expiry's "stop" cannot reach storage after the write of a newer start.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use beacon_common::TrackerConfig;
use beacon_core::{
    ActiveRecord, DeviceStatus, DomainError, EntityKey, MirrorPath, OwnerScope, StatusEvent,
    StatusMirror, StatusPayload, StatusReport,
};
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::key_lock::KeyLocks;
use crate::partition::Partition;
use crate::timer::ExpiryTimer;

/// Counts across all partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub partitions: usize,
    pub active: usize,
    pub timers: usize,
}

struct TrackerInner {
    partitions: DashMap<OwnerScope, Partition>,
    key_locks: KeyLocks,
    mirror: Arc<dyn StatusMirror>,
    timeout: Duration,
    require_owner: bool,
    generation: AtomicU64,
    closed: AtomicBool,
}

/// Handle to the shared tracker state. Cloning is cheap.
#[derive(Clone)]
pub struct PresenceTracker {
    inner: Arc<TrackerInner>,
}

impl PresenceTracker {
    pub fn new(mirror: Arc<dyn StatusMirror>, config: &TrackerConfig) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                partitions: DashMap::new(),
                key_locks: KeyLocks::default(),
                mirror,
                timeout: config.timeout(),
                require_owner: config.require_owner,
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Expiry timeout applied to every start
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Apply a status report and mirror it to external storage.
    ///
    /// The report is validated before any state changes. If the mirror write
    /// fails the error is returned, but the in-memory change stands.
    #[instrument(skip(self, report), fields(name = ?report.name, esp32_id = ?report.esp32_id, status = ?report.status))]
    pub async fn report_status(&self, report: StatusReport) -> TrackerResult<StatusEvent> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(TrackerError::Closed);
        }

        let event = report.normalize(self.inner.require_owner)?;

        let _write = self.inner.key_locks.acquire(&event.key()).await;
        self.apply(&event)?;

        if let Err(e) = self
            .inner
            .mirror
            .set(event.path(), &StatusPayload::from_event(&event))
            .await
        {
            warn!(path = %event.path(), error = %e, "Failed to mirror status");
            return Err(e.into());
        }

        Ok(event)
    }

    /// Names active in the owner's scope, in activation order
    #[instrument(skip(self))]
    pub fn list_active(&self, owner_id: Option<&str>) -> TrackerResult<Vec<String>> {
        let scope = self.scope_for(owner_id)?;
        Ok(self
            .inner
            .partitions
            .get(&scope)
            .map(|partition| partition.names())
            .unwrap_or_default())
    }

    /// Active records in the owner's scope, in activation order
    pub fn active_records(&self, owner_id: Option<&str>) -> TrackerResult<Vec<ActiveRecord>> {
        let scope = self.scope_for(owner_id)?;
        Ok(self
            .inner
            .partitions
            .get(&scope)
            .map(|partition| partition.records().to_vec())
            .unwrap_or_default())
    }

    /// Revert `key` to stop on behalf of the timer armed at `generation`.
    ///
    /// Called by expiry timers. Returns false, doing nothing, when the entity
    /// is no longer active or was restarted after the timer was armed. Mirror
    /// failures are logged, never returned.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn expire(&self, key: &EntityKey, device_id: &str, generation: u64) -> bool {
        let _write = self.inner.key_locks.acquire(key).await;

        let expired = self
            .inner
            .partitions
            .get_mut(&key.owner)
            .and_then(|mut partition| partition.expire(&key.name, generation));

        if expired.is_none() {
            debug!(generation, "Ignoring superseded expiry");
            return false;
        }

        info!(esp32_id = %device_id, "Timeout reached, reverting status to stop");

        let path = match MirrorPath::for_device(&key.name, device_id, &key.owner) {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Cannot build storage path for expired entity");
                return true;
            }
        };

        if let Err(e) = self.inner.mirror.set(&path, &StatusPayload::stop()).await {
            error!(path = %path, error = %e, "Failed to mirror expiry");
        }

        true
    }

    /// Stop accepting events and cancel every pending timer.
    ///
    /// Returns the number of timers cancelled. Active records are kept so the
    /// queues can still be read while the server drains.
    pub fn shutdown(&self) -> usize {
        self.inner.closed.store(true, Ordering::Release);

        let cancelled: usize = self
            .inner
            .partitions
            .iter_mut()
            .map(|mut partition| partition.cancel_timers())
            .sum();

        info!(cancelled, "Presence tracker shut down");
        cancelled
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> TrackerStats {
        self.inner.partitions.iter().fold(
            TrackerStats {
                partitions: 0,
                active: 0,
                timers: 0,
            },
            |mut stats, partition| {
                stats.partitions += 1;
                stats.active += partition.records().len();
                stats.timers += partition.timer_count();
                stats
            },
        )
    }

    fn scope_for(&self, owner_id: Option<&str>) -> TrackerResult<OwnerScope> {
        let scope = OwnerScope::from_optional(owner_id);
        if self.inner.require_owner && scope.is_global() {
            return Err(DomainError::MissingOwner.into());
        }
        Ok(scope)
    }

    /// Update in-memory state for a validated event
    fn apply(&self, event: &StatusEvent) -> TrackerResult<()> {
        let mut partition = self.inner.partitions.entry(event.owner.clone()).or_default();

        // Checked again under the partition guard: once `shutdown` has swept
        // this partition no new timer may be armed in it.
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(TrackerError::Closed);
        }

        match event.status {
            DeviceStatus::Start => {
                let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
                // Armed while the partition is held: even a zero timeout cannot
                // fire before the record it reverts exists.
                let timer = self.arm_timer(event.key(), event.device_id.clone(), generation);
                let newly_active =
                    partition.activate(&event.name, &event.device_id, generation, timer);

                debug!(
                    key = %event.key(),
                    generation,
                    newly_active,
                    "Entity started"
                );
            }
            DeviceStatus::Stop => {
                let was_active = partition.deactivate(&event.name).is_some();
                debug!(key = %event.key(), was_active, "Entity stopped");
            }
        }

        Ok(())
    }

    fn arm_timer(&self, key: EntityKey, device_id: String, generation: u64) -> ExpiryTimer {
        // Weak, so a pending timer does not keep a dropped tracker alive.
        let tracker: Weak<TrackerInner> = Arc::downgrade(&self.inner);

        ExpiryTimer::spawn(self.inner.timeout, async move {
            if let Some(inner) = tracker.upgrade() {
                PresenceTracker { inner }
                    .expire(&key, &device_id, generation)
                    .await;
            }
        })
    }
}

impl std::fmt::Debug for PresenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceTracker")
            .field("timeout", &self.inner.timeout)
            .field("require_owner", &self.inner.require_owner)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
