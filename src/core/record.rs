//! Persisted template rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `questions_tpl` table
///
/// `text` and `keywords` hold JSON documents; they are decoded only when a
/// template is built for serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub version: String,
    pub name: String,
    /// Serialized question schema
    pub text: String,
    /// Serialized keyword bundle
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub page_layout: Option<String>,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default)]
    pub created_by: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub modified_by: i64,
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

impl TemplateRecord {
    /// New unsealed record with the given schema text
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            version: String::new(),
            name: name.into(),
            text: text.into(),
            keywords: None,
            page_layout: None,
            is_sealed: false,
            created_by: 0,
            created_at: now,
            modified_by: 0,
            modified_at: now,
        }
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }
}

/// Id and seal flag of a row, enough to pick the active template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateState {
    pub id: i64,
    pub is_sealed: bool,
}
