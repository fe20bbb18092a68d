//! Served templates
//!
//! A [`ServedTemplate`] is built from a raw [`TemplateRecord`] in one go:
//! the schema and keyword payloads are decoded, the schema text is
//! fingerprinted, and leaf lookups are derived from the tree. Nothing is
//! mutated after construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::core::record::TemplateRecord;
use crate::schema::{CategoryBasic, LeafInfo, QuestionDesc, QuestionsSchema};

/// Keyword lists attached to a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TplKeywords {
    #[serde(default)]
    pub match_keywords: Vec<String>,
    #[serde(default)]
    pub ai_keywords: Vec<String>,
    #[serde(default)]
    pub to_job_keys: Vec<String>,
    #[serde(default)]
    pub ai_gen_jd_keys: Vec<String>,
}

/// A template ready to be handed to readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServedTemplate {
    pub id: i64,
    pub name: String,
    pub schema: QuestionsSchema<QuestionDesc>,
    pub layout: String,
    /// Leaf summaries keyed by leaf code
    pub leaf_infos: HashMap<String, LeafInfo>,
    /// Leaf name and code, in tree order
    pub simple_leafs: Vec<CategoryBasic>,
    /// Hex SHA-256 of the raw schema text
    pub schema_fingerprint: String,
    pub keywords: Option<TplKeywords>,
}

impl ServedTemplate {
    /// Build a template from a raw record
    ///
    /// Malformed schema or keyword JSON is logged and replaced by an empty
    /// schema / no keywords; it never fails the build.
    pub fn from_record(record: &TemplateRecord) -> Self {
        let schema = decode_schema(record);
        let keywords = record.keywords.as_deref().map(|raw| decode_keywords(record.id, raw));

        if let Err(problem) = schema.validate() {
            if !schema.contents.is_empty() {
                warn!(id = record.id, %problem, "template schema is malformed, some questions will not be served");
            }
        }

        let leafs = schema.leafs();
        let simple_leafs = leafs.iter().map(|leaf| leaf.basic.clone()).collect();
        let leaf_infos = leafs
            .into_iter()
            .map(|leaf| (leaf.basic.code.clone(), leaf))
            .collect();

        Self {
            id: record.id,
            name: record.name.clone(),
            schema,
            layout: record.page_layout.clone().unwrap_or_default(),
            leaf_infos,
            simple_leafs,
            schema_fingerprint: fingerprint(record.text.as_bytes()),
            keywords,
        }
    }

    /// Leaf summary by leaf code
    pub fn leaf(&self, code: &str) -> Option<&LeafInfo> {
        self.leaf_infos.get(code)
    }
}

fn decode_schema(record: &TemplateRecord) -> QuestionsSchema<QuestionDesc> {
    match serde_json::from_str(&record.text) {
        Ok(schema) => schema,
        Err(err) => {
            warn!(id = record.id, error = %err, "could not decode template schema, serving it empty");
            QuestionsSchema::default()
        }
    }
}

fn decode_keywords(id: i64, raw: &str) -> TplKeywords {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!(id, error = %err, "could not decode template keywords");
        TplKeywords::default()
    })
}

/// Lowercase hex SHA-256 of `data`
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "Leaf": 2,
        "MaxQuestionId": 3,
        "Contents": [
            {"name": "Skills", "code": "S", "appendable": true, "children": [
                {"name": "Languages", "code": "L", "questions": [
                    {"id": 1, "desc": "Rust?"},
                    {"id": 2, "desc": "Go?"}
                ]},
                {"name": "Tools", "code": "T", "replace": true, "questions": [
                    {"id": 3, "desc": "Git?"}
                ]}
            ]}
        ]
    }"#;

    fn record() -> TemplateRecord {
        let mut record = TemplateRecord::new("Backend", SCHEMA);
        record.id = 7;
        record.page_layout = Some("two-column".to_string());
        record.keywords = Some(
            r#"{"matchKeywords":["rust"],"aiKeywords":["systems"],"toJobKeys":[],"aiGenJdKeys":["jd"]}"#
                .to_string(),
        );
        record
    }

    #[test]
    fn test_from_record_derives_leafs() {
        let tpl = ServedTemplate::from_record(&record());
        assert_eq!(tpl.id, 7);
        assert_eq!(tpl.name, "Backend");
        assert_eq!(tpl.layout, "two-column");
        assert_eq!(tpl.schema.leaf, 2);

        assert_eq!(
            tpl.simple_leafs,
            vec![CategoryBasic::new("Languages", "L"), CategoryBasic::new("Tools", "T")]
        );
        assert_eq!(tpl.leaf_infos.len(), 2);
        assert_eq!(tpl.leaf("L").unwrap().path, "S.L");
        assert!(tpl.leaf("T").unwrap().replace);
        assert!(tpl.leaf("S").is_none());
    }

    #[test]
    fn test_keywords_decoded() {
        let tpl = ServedTemplate::from_record(&record());
        let keywords = tpl.keywords.unwrap();
        assert_eq!(keywords.match_keywords, vec!["rust"]);
        assert_eq!(keywords.ai_keywords, vec!["systems"]);
        assert!(keywords.to_job_keys.is_empty());
        assert_eq!(keywords.ai_gen_jd_keys, vec!["jd"]);
    }

    #[test]
    fn test_missing_keywords_and_layout() {
        let mut rec = record();
        rec.keywords = None;
        rec.page_layout = None;
        let tpl = ServedTemplate::from_record(&rec);
        assert!(tpl.keywords.is_none());
        assert_eq!(tpl.layout, "");
    }

    #[test]
    fn test_malformed_schema_is_tolerated() {
        let mut rec = record();
        rec.text = "{not json".to_string();
        let tpl = ServedTemplate::from_record(&rec);

        assert_eq!(tpl.schema, QuestionsSchema::default());
        assert!(tpl.leaf_infos.is_empty());
        assert!(tpl.simple_leafs.is_empty());
        assert_eq!(tpl.schema_fingerprint, fingerprint(b"{not json"));
        assert!(tpl.keywords.is_some());
    }

    #[test]
    fn test_malformed_keywords_are_tolerated() {
        let mut rec = record();
        rec.keywords = Some("[1, 2".to_string());
        let tpl = ServedTemplate::from_record(&rec);
        assert_eq!(tpl.keywords, Some(TplKeywords::default()));
        assert_eq!(tpl.simple_leafs.len(), 2);
    }

    #[test]
    fn test_fingerprint() {
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let tpl = ServedTemplate::from_record(&record());
        assert_eq!(tpl.schema_fingerprint, fingerprint(SCHEMA.as_bytes()));
        assert_eq!(tpl.schema_fingerprint.len(), 64);
    }
}
