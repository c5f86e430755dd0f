//! Per-owner tracking state
//!
//! A partition holds the active records of one owner scope, in activation
//! order, and the expiry timer of each. Every method keeps the invariant that
//! a name has a timer exactly when it has a record.

use std::collections::HashMap;

use beacon_core::ActiveRecord;

use crate::timer::ExpiryTimer;

#[derive(Debug, Default)]
pub(crate) struct Partition {
    records: Vec<ActiveRecord>,
    timers: HashMap<String, ExpiryTimer>,
}

impl Partition {
    /// Mark `name` active under `generation` and install its timer, replacing
    /// (and cancelling) any previous one. Returns true if the name was not
    /// active before.
    pub(crate) fn activate(
        &mut self,
        name: &str,
        device_id: &str,
        generation: u64,
        timer: ExpiryTimer,
    ) -> bool {
        let newly_active = match self.records.iter_mut().find(|r| r.name == name) {
            Some(record) => {
                record.refresh(generation);
                false
            }
            None => {
                self.records.push(ActiveRecord::new(name, device_id, generation));
                true
            }
        };

        if let Some(previous) = self.timers.insert(name.to_string(), timer) {
            previous.cancel();
        }

        newly_active
    }

    /// Remove `name` and cancel its timer
    pub(crate) fn deactivate(&mut self, name: &str) -> Option<ActiveRecord> {
        if let Some(timer) = self.timers.remove(name) {
            timer.cancel();
        }
        self.take_record(name)
    }

    /// Remove `name` on behalf of the timer armed at `generation`.
    ///
    /// Returns `None` when the record is gone or a newer start has taken over.
    /// The timer handle is dropped, not cancelled: the caller is that timer.
    pub(crate) fn expire(&mut self, name: &str, generation: u64) -> Option<ActiveRecord> {
        let current = self.records.iter().find(|r| r.name == name)?.generation;
        if current != generation {
            return None;
        }

        self.timers.remove(name);
        self.take_record(name)
    }

    /// Cancel every timer, keeping the records
    pub(crate) fn cancel_timers(&mut self) -> usize {
        let count = self.timers.len();
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
        count
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub(crate) fn records(&self) -> &[ActiveRecord] {
        &self.records
    }

    pub(crate) fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn take_record(&mut self, name: &str) -> Option<ActiveRecord> {
        let index = self.records.iter().position(|r| r.name == name)?;
        Some(self.records.remove(index))
    }
}
