//! Core module - template storage, loading and caching

pub mod cache;
pub mod config;
pub mod loader;
pub mod record;
pub mod store;
pub mod template;

pub use cache::{CacheConfig, CacheError, TemplateCache};
pub use config::Config;
pub use loader::{LoadContext, StoreSource, TemplateSource};
pub use record::{TemplateRecord, TemplateState};
pub use store::{SqliteTemplateStore, StoreError, TemplateStore};
pub use template::{ServedTemplate, TplKeywords};
