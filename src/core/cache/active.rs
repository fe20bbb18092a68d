//! TTL-refreshed slot for the active template

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::CacheError;
use crate::core::template::ServedTemplate;

#[derive(Default)]
struct ActiveState {
    template: Option<Arc<ServedTemplate>>,
    /// `None` with a template present means the TTL is too large to
    /// represent and the template never expires
    expires_at: Option<Instant>,
}

impl ActiveState {
    /// The cached template if it has not expired at `now`
    fn fresh(&self, now: Instant) -> Option<Arc<ServedTemplate>> {
        let template = self.template.as_ref()?;
        match self.expires_at {
            Some(expires_at) if now >= expires_at => None,
            _ => Some(Arc::clone(template)),
        }
    }
}

/// Single cached template refreshed once its TTL runs out
///
/// Readers inside the TTL only take the read lock. Refreshes are serialized
/// on the write lock and re-check expiry, so contending callers trigger one
/// load per expiry window.
pub(super) struct ActiveSlot {
    state: RwLock<ActiveState>,
    ttl: Duration,
}

impl ActiveSlot {
    pub(super) fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(ActiveState::default()),
            ttl,
        }
    }

    /// Return the cached template, running `load` if it has expired
    ///
    /// A failed load leaves the previous template in place and is reported
    /// only to this caller.
    pub(super) fn get<F>(
        &self,
        wait_timeout: Option<Duration>,
        load: F,
    ) -> Result<Arc<ServedTemplate>, CacheError>
    where
        F: FnOnce() -> Result<ServedTemplate, CacheError>,
    {
        {
            // Blocks only while another caller holds the write lock for a refresh
            let state = match wait_timeout {
                Some(timeout) => self
                    .state
                    .try_read_for(timeout)
                    .ok_or_else(|| refresh_timeout(timeout))?,
                None => self.state.read(),
            };
            if let Some(template) = state.fresh(Instant::now()) {
                return Ok(template);
            }
        }

        let mut state = match wait_timeout {
            Some(timeout) => self
                .state
                .try_write_for(timeout)
                .ok_or_else(|| refresh_timeout(timeout))?,
            None => self.state.write(),
        };

        // Another caller may have refreshed while we waited for the lock
        if let Some(template) = state.fresh(Instant::now()) {
            return Ok(template);
        }

        let template = Arc::new(load()?);
        state.template = Some(Arc::clone(&template));
        state.expires_at = Instant::now().checked_add(self.ttl);
        Ok(template)
    }

    /// Last successfully loaded template, expired or not
    pub(super) fn peek(&self) -> Option<Arc<ServedTemplate>> {
        self.state.read().template.clone()
    }
}

fn refresh_timeout(timeout: Duration) -> CacheError {
    CacheError::Timeout {
        what: "active template refresh".to_string(),
        waited_ms: super::millis(timeout),
    }
}
