//! Template cache
//!
//! Two policies share one [`TemplateSource`]:
//! - the active template sits in a single slot refreshed every `ttl`
//! - sealed templates are loaded at most once per id and kept forever
//!
//! Readers get `Arc<ServedTemplate>` handles and never observe a template
//! being modified.

mod active;
mod error;
mod sealed;

pub use error::CacheError;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::loader::{LoadContext, TemplateSource};
use crate::core::template::ServedTemplate;

use active::ActiveSlot;
use sealed::SealedTemplates;

/// How long an active template is served before it is reloaded
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Upper bound on waiting for someone else's load; `None` waits forever
    pub wait_timeout: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            wait_timeout: None,
        }
    }
}

/// Concurrent cache of served templates
pub struct TemplateCache {
    source: Arc<dyn TemplateSource>,
    active: ActiveSlot,
    sealed: SealedTemplates,
    config: CacheConfig,
}

impl TemplateCache {
    pub fn new(source: Arc<dyn TemplateSource>, config: CacheConfig) -> Self {
        Self {
            source,
            active: ActiveSlot::new(config.ttl),
            sealed: SealedTemplates::new(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The currently active template, refreshed when its TTL has passed
    pub fn active(&self, ctx: &LoadContext) -> Result<Arc<ServedTemplate>, CacheError> {
        self.active.get(self.config.wait_timeout, || {
            match self.source.load_active(ctx) {
                Ok(record) => {
                    let template = ServedTemplate::from_record(&record);
                    info!(
                        trace_id = %ctx,
                        id = template.id,
                        fingerprint = %template.schema_fingerprint,
                        "refreshed active template"
                    );
                    Ok(template)
                }
                Err(err) => {
                    warn!(trace_id = %ctx, error = %err, "active template refresh failed");
                    Err(err)
                }
            }
        })
    }

    /// A sealed template, loaded once and then served from memory
    pub fn sealed(&self, ctx: &LoadContext, id: i64) -> Result<Arc<ServedTemplate>, CacheError> {
        self.sealed.get(id, self.config.wait_timeout, || {
            match self.source.load_sealed(ctx, id) {
                Ok(record) => {
                    let template = ServedTemplate::from_record(&record);
                    info!(trace_id = %ctx, id, fingerprint = %template.schema_fingerprint, "loaded sealed template");
                    Ok(template)
                }
                Err(err) => {
                    warn!(trace_id = %ctx, id, error = %err, "sealed template load failed");
                    Err(err)
                }
            }
        })
    }

    /// Resolve a template by id
    ///
    /// The active template is consulted first so it is reachable by its own
    /// id; every other id goes through the sealed cache.
    pub fn get_by_template_id(
        &self,
        ctx: &LoadContext,
        id: i64,
    ) -> Result<Arc<ServedTemplate>, CacheError> {
        let active = self.active(ctx)?;
        if active.id == id {
            return Ok(active);
        }

        debug!(trace_id = %ctx, id, active = active.id, "resolving sealed template");
        self.sealed(ctx, id)
    }

    /// Last loaded active template without triggering a refresh
    pub fn peek_active(&self) -> Option<Arc<ServedTemplate>> {
        self.active.peek()
    }

    /// Number of sealed entries, loaded or in flight
    pub fn sealed_len(&self) -> usize {
        self.sealed.len()
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
