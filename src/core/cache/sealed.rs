//! Load-once cache for sealed templates
//!
//! Each id maps to an entry that starts pending and is completed exactly
//! once by the caller that inserted it. Everyone else blocks on the entry
//! until the outcome is published. Successful entries stay forever; failed
//! ones are evicted before their waiters are released, so the next request
//! starts a fresh load.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use tracing::debug;

use super::CacheError;
use crate::core::template::ServedTemplate;

type LoadOutcome = Result<Arc<ServedTemplate>, CacheError>;

struct SealedEntry {
    outcome: Mutex<Option<LoadOutcome>>,
    ready: Condvar,
}

impl SealedEntry {
    fn pending() -> Self {
        Self {
            outcome: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: LoadOutcome) {
        let mut slot = self.outcome.lock();
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    fn wait(&self, id: i64, timeout: Option<Duration>) -> LoadOutcome {
        // A timeout too large to represent waits like no timeout
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut slot = self.outcome.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            match deadline {
                None => self.ready.wait(&mut slot),
                Some(deadline) => {
                    if self.ready.wait_until(&mut slot, deadline).timed_out() && slot.is_none() {
                        return Err(CacheError::Timeout {
                            what: format!("sealed template {}", id),
                            waited_ms: timeout.map(super::millis).unwrap_or_default(),
                        });
                    }
                }
            }
        }
    }
}

/// Sealed templates keyed by id
pub(super) struct SealedTemplates {
    entries: DashMap<i64, Arc<SealedEntry>>,
}

impl SealedTemplates {
    pub(super) fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Return the template for `id`, running `load` only if no other caller
    /// is already loading or has loaded it
    pub(super) fn get<F>(&self, id: i64, wait_timeout: Option<Duration>, load: F) -> LoadOutcome
    where
        F: FnOnce() -> Result<ServedTemplate, CacheError>,
    {
        if let Some(entry) = self.entries.get(&id).map(|e| Arc::clone(e.value())) {
            return entry.wait(id, wait_timeout);
        }

        let fresh = Arc::new(SealedEntry::pending());
        let existing = match self.entries.entry(id) {
            Entry::Occupied(occupied) => Some(Arc::clone(occupied.get())),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(&fresh));
                None
            }
        };
        if let Some(entry) = existing {
            return entry.wait(id, wait_timeout);
        }

        let pending = PendingLoad {
            entries: &self.entries,
            id,
            entry: &fresh,
            finished: false,
        };
        let outcome = load().map(Arc::new);
        pending.finish(outcome)
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Completes an entry exactly once, even if the loader unwinds
struct PendingLoad<'a> {
    entries: &'a DashMap<i64, Arc<SealedEntry>>,
    id: i64,
    entry: &'a Arc<SealedEntry>,
    finished: bool,
}

impl PendingLoad<'_> {
    fn finish(mut self, outcome: LoadOutcome) -> LoadOutcome {
        self.finished = true;
        if outcome.is_err() {
            self.evict();
        }
        self.entry.publish(outcome.clone());
        outcome
    }

    fn evict(&self) {
        let removed = self
            .entries
            .remove_if(&self.id, |_, current| Arc::ptr_eq(current, self.entry));
        if removed.is_some() {
            debug!(id = self.id, "evicted failed sealed template load");
        }
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.evict();
            self.entry.publish(Err(CacheError::LoaderPanicked(self.id)));
        }
    }
}
