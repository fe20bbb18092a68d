//! Question schema tree types
//!
//! A schema is a forest of categories. Every branch descends to the same
//! declared leaf depth, and only nodes at that depth carry questions.

use serde::{Deserialize, Serialize};

/// Root of a question schema, generic over the question payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionsSchema<T> {
    /// 1-based depth at which categories hold questions
    #[serde(default)]
    pub leaf: usize,

    /// Highest question id handed out so far (owned by schema editors)
    #[serde(default)]
    pub max_question_id: i64,

    /// Top-level categories, in display order
    #[serde(default = "Vec::new")]
    pub contents: Vec<Category<T>>,
}

impl<T> Default for QuestionsSchema<T> {
    fn default() -> Self {
        Self {
            leaf: 0,
            max_question_id: 0,
            contents: Vec::new(),
        }
    }
}

impl<T> QuestionsSchema<T> {
    pub fn new(leaf: usize, contents: Vec<Category<T>>) -> Self {
        Self {
            leaf,
            max_question_id: 0,
            contents,
        }
    }
}

/// Name and code of a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryBasic {
    pub name: String,
    /// Unique among siblings; joined with `.` to form paths
    pub code: String,
}

impl CategoryBasic {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// One level of the category hierarchy
///
/// Internal nodes use `children`, leaf nodes use `questions`. A node never
/// populates both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category<T> {
    #[serde(flatten)]
    pub basic: CategoryBasic,

    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category<T>>,

    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<T>,

    /// Questions below this category accept caller-added entries
    #[serde(default)]
    pub appendable: bool,

    #[serde(default)]
    pub replace: bool,
}

impl<T> Category<T> {
    /// Create an internal category
    pub fn branch(
        name: impl Into<String>,
        code: impl Into<String>,
        children: Vec<Category<T>>,
    ) -> Self {
        Self {
            basic: CategoryBasic::new(name, code),
            children,
            questions: Vec::new(),
            appendable: false,
            replace: false,
        }
    }

    /// Create a leaf category holding questions
    pub fn leaf(name: impl Into<String>, code: impl Into<String>, questions: Vec<T>) -> Self {
        Self {
            basic: CategoryBasic::new(name, code),
            children: Vec::new(),
            questions,
            appendable: false,
            replace: false,
        }
    }

    pub fn with_appendable(mut self, appendable: bool) -> Self {
        self.appendable = appendable;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn name(&self) -> &str {
        &self.basic.name
    }

    pub fn code(&self) -> &str {
        &self.basic.code
    }
}

/// Question payload stored in persisted templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDesc {
    pub id: i64,
    pub desc: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

/// Summary of one leaf category, produced by traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafInfo {
    /// Codes from root to leaf joined with `.`
    pub path: String,
    #[serde(flatten)]
    pub basic: CategoryBasic,
    pub replace: bool,
}

/// A question together with the category path that leads to it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatQuestion<'a, T> {
    pub full_path_string: String,
    /// Code of every category on the path
    pub path: Vec<String>,
    #[serde(skip)]
    pub path_cate: Vec<&'a Category<T>>,
    pub question: &'a T,
    pub appendable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_json_shape() {
        let json = r#"{
            "Leaf": 2,
            "MaxQuestionId": 7,
            "Contents": [
                {
                    "name": "Skills",
                    "code": "S",
                    "appendable": true,
                    "children": [
                        {
                            "name": "Languages",
                            "code": "L",
                            "replace": true,
                            "questions": [
                                {"id": 1, "desc": "Rust?", "isDefault": true},
                                {"id": 2, "desc": "Go?", "parentCode": "L"}
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let schema: QuestionsSchema<QuestionDesc> = serde_json::from_str(json).unwrap();
        assert_eq!(schema.leaf, 2);
        assert_eq!(schema.max_question_id, 7);
        assert_eq!(schema.contents.len(), 1);

        let root = &schema.contents[0];
        assert_eq!(root.code(), "S");
        assert!(root.appendable);
        assert!(root.questions.is_empty());

        let leaf = &root.children[0];
        assert!(leaf.replace);
        assert!(!leaf.appendable);
        assert_eq!(leaf.questions.len(), 2);
        assert!(leaf.questions[0].is_default);
        assert_eq!(leaf.questions[1].parent_code.as_deref(), Some("L"));
    }

    #[test]
    fn test_empty_vectors_not_serialized() {
        let cat: Category<QuestionDesc> = Category::leaf("Leaf", "X", vec![]);
        let value = serde_json::to_value(&cat).unwrap();
        assert!(value.get("children").is_none());
        assert!(value.get("questions").is_none());
        assert_eq!(value["code"], "X");
        assert_eq!(value["appendable"], false);
    }

    #[test]
    fn test_default_schema_is_empty() {
        let schema: QuestionsSchema<QuestionDesc> = QuestionsSchema::default();
        assert_eq!(schema.leaf, 0);
        assert!(schema.contents.is_empty());
    }
}
