//! Cache error types

use miette::Diagnostic;
use thiserror::Error;

use crate::core::store::StoreError;

/// Errors returned by template loading and the template cache
///
/// Cloneable so a single failed load can be handed to every caller that
/// waited on it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CacheError {
    #[error("no active template")]
    #[diagnostic(
        code(dyschema::cache::no_active),
        help("exactly one template must be left unsealed")
    )]
    NoActiveTemplate,

    #[error("need exactly one active template, found {}", ids.len())]
    #[diagnostic(
        code(dyschema::cache::multiple_active),
        help("seal all but one of templates {ids:?}")
    )]
    MultipleActiveTemplates { ids: Vec<i64> },

    #[error("template {0} does not exist")]
    #[diagnostic(code(dyschema::cache::not_found))]
    TemplateNotFound(i64),

    #[error("template {0} is still in use and not sealed")]
    #[diagnostic(code(dyschema::cache::not_sealed))]
    TemplateNotSealed(i64),

    #[error("template store failed: {0}")]
    #[diagnostic(code(dyschema::cache::store))]
    Store(String),

    #[error("gave up waiting for {what} after {waited_ms}ms")]
    #[diagnostic(code(dyschema::cache::timeout))]
    Timeout { what: String, waited_ms: u64 },

    #[error("loader for template {0} panicked")]
    #[diagnostic(code(dyschema::cache::loader_panicked))]
    LoaderPanicked(i64),
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing(id) => CacheError::TemplateNotFound(id),
            other => CacheError::Store(other.to_string()),
        }
    }
}
