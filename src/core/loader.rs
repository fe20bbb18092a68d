//! Template loading collaborators
//!
//! The cache never touches storage directly. It asks a [`TemplateSource`]
//! for the raw record of the active template or of a sealed one, and the
//! source enforces the selection rules.

use std::fmt;

use tracing::debug;
use ulid::Ulid;

use crate::core::cache::CacheError;
use crate::core::record::TemplateRecord;
use crate::core::store::TemplateStore;

/// Per-request context handed to every load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub trace_id: String,
}

impl LoadContext {
    /// Context with a freshly generated trace id
    pub fn new() -> Self {
        Self {
            trace_id: Ulid::new().to_string(),
        }
    }

    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

impl Default for LoadContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trace_id)
    }
}

/// Supplies raw template records to the cache
pub trait TemplateSource: Send + Sync {
    /// The single unsealed template
    ///
    /// Fails with [`CacheError::NoActiveTemplate`] or
    /// [`CacheError::MultipleActiveTemplates`] when the store does not hold
    /// exactly one.
    fn load_active(&self, ctx: &LoadContext) -> Result<TemplateRecord, CacheError>;

    /// A sealed template by id
    ///
    /// Fails with [`CacheError::TemplateNotFound`] when the row is missing
    /// and [`CacheError::TemplateNotSealed`] when it is still active.
    fn load_sealed(&self, ctx: &LoadContext, id: i64) -> Result<TemplateRecord, CacheError>;
}

/// [`TemplateSource`] reading from a [`TemplateStore`]
pub struct StoreSource<S> {
    store: S,
}

impl<S: TemplateStore> StoreSource<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TemplateStore> TemplateSource for StoreSource<S> {
    fn load_active(&self, ctx: &LoadContext) -> Result<TemplateRecord, CacheError> {
        let ids: Vec<i64> = self
            .store
            .template_states()?
            .into_iter()
            .filter(|state| !state.is_sealed)
            .map(|state| state.id)
            .collect();

        let id = match ids.as_slice() {
            [] => return Err(CacheError::NoActiveTemplate),
            [id] => *id,
            _ => return Err(CacheError::MultipleActiveTemplates { ids }),
        };

        debug!(trace_id = %ctx, id, "loading active template");
        // The row may disappear between the two reads
        self.store
            .get_by_id(id)?
            .ok_or(CacheError::NoActiveTemplate)
    }

    fn load_sealed(&self, ctx: &LoadContext, id: i64) -> Result<TemplateRecord, CacheError> {
        debug!(trace_id = %ctx, id, "loading sealed template");
        let record = self
            .store
            .get_by_id(id)?
            .ok_or(CacheError::TemplateNotFound(id))?;

        if !record.is_sealed {
            return Err(CacheError::TemplateNotSealed(id));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::SqliteTemplateStore;

    fn source() -> StoreSource<SqliteTemplateStore> {
        StoreSource::new(SqliteTemplateStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_no_active_template() {
        let src = source();
        src.store()
            .insert(&TemplateRecord::new("old", "{}").sealed())
            .unwrap();

        let err = src.load_active(&LoadContext::new()).unwrap_err();
        assert_eq!(err, CacheError::NoActiveTemplate);
    }

    #[test]
    fn test_empty_store_has_no_active() {
        let err = source().load_active(&LoadContext::new()).unwrap_err();
        assert_eq!(err, CacheError::NoActiveTemplate);
    }

    #[test]
    fn test_multiple_active_templates() {
        let src = source();
        let a = src.store().insert(&TemplateRecord::new("a", "{}")).unwrap();
        let b = src.store().insert(&TemplateRecord::new("b", "{}")).unwrap();

        let err = src.load_active(&LoadContext::new()).unwrap_err();
        assert_eq!(err, CacheError::MultipleActiveTemplates { ids: vec![a, b] });
    }

    #[test]
    fn test_single_active_template() {
        let src = source();
        src.store()
            .insert(&TemplateRecord::new("old", "{}").sealed())
            .unwrap();
        let active = src.store().insert(&TemplateRecord::new("current", "{}")).unwrap();

        let record = src.load_active(&LoadContext::new()).unwrap();
        assert_eq!(record.id, active);
        assert_eq!(record.name, "current");
    }

    #[test]
    fn test_sealed_lookup_rules() {
        let src = source();
        let sealed = src
            .store()
            .insert(&TemplateRecord::new("old", "{}").sealed())
            .unwrap();
        let active = src.store().insert(&TemplateRecord::new("current", "{}")).unwrap();
        let ctx = LoadContext::with_trace_id("t-1");

        assert_eq!(src.load_sealed(&ctx, sealed).unwrap().name, "old");
        assert_eq!(
            src.load_sealed(&ctx, active).unwrap_err(),
            CacheError::TemplateNotSealed(active)
        );
        assert_eq!(
            src.load_sealed(&ctx, 999).unwrap_err(),
            CacheError::TemplateNotFound(999)
        );
    }

    #[test]
    fn test_context_trace_ids_are_unique() {
        assert_ne!(LoadContext::new(), LoadContext::new());
        assert_eq!(LoadContext::with_trace_id("abc").to_string(), "abc");
    }
}
