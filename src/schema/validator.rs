//! Structural checks for question schemas
//!
//! Traversal and transformation trust the schema: a branch that stops above
//! the leaf depth or continues below it simply produces nothing. These checks
//! make such problems visible before a schema is published.

use miette::Diagnostic;
use std::collections::HashSet;
use thiserror::Error;

use super::tree::{Category, QuestionsSchema};

/// A structural problem found in a schema
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SchemaError {
    #[error("schema declares leaf depth 0; no category can hold questions")]
    #[diagnostic(code(dyschema::schema::zero_leaf_depth))]
    ZeroLeafDepth,

    #[error("branch '{path}' ends at depth {depth}, expected leaves at depth {expected}")]
    #[diagnostic(
        code(dyschema::schema::depth_mismatch),
        help("every branch must reach exactly the declared `Leaf` depth")
    )]
    DepthMismatch {
        path: String,
        depth: usize,
        expected: usize,
    },

    #[error("category '{path}' has questions but sits above the leaf depth")]
    #[diagnostic(
        code(dyschema::schema::mixed_node),
        help("questions on internal categories are never served")
    )]
    MixedNode { path: String },

    #[error("duplicate code '{code}' under '{path}'")]
    #[diagnostic(code(dyschema::schema::duplicate_code))]
    DuplicateCode { path: String, code: String },
}

impl<T> QuestionsSchema<T> {
    /// Collect every structural problem, in tree order
    pub fn problems(&self) -> Vec<SchemaError> {
        let mut problems = Vec::new();
        if self.leaf == 0 {
            problems.push(SchemaError::ZeroLeafDepth);
            return problems;
        }

        let mut path = Vec::new();
        check_siblings(&self.contents, &path, &mut problems);
        for cate in &self.contents {
            check_category(cate, self.leaf, &mut path, &mut problems);
        }
        problems
    }

    /// Fail with the first structural problem, if any
    pub fn validate(&self) -> Result<(), SchemaError> {
        match self.problems().into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }
}

fn check_category<'a, T>(
    cate: &'a Category<T>,
    leaf: usize,
    path: &mut Vec<&'a str>,
    problems: &mut Vec<SchemaError>,
) {
    path.push(cate.code());
    let depth = path.len();

    if depth == leaf {
        if !cate.children.is_empty() {
            problems.push(SchemaError::DepthMismatch {
                path: path.join("."),
                depth: depth + 1,
                expected: leaf,
            });
        }
    } else {
        if !cate.questions.is_empty() {
            problems.push(SchemaError::MixedNode {
                path: path.join("."),
            });
        }
        if cate.children.is_empty() {
            problems.push(SchemaError::DepthMismatch {
                path: path.join("."),
                depth,
                expected: leaf,
            });
        }
        check_siblings(&cate.children, path, problems);
        for child in &cate.children {
            check_category(child, leaf, path, problems);
        }
    }

    path.pop();
}

fn check_siblings<T>(siblings: &[Category<T>], path: &[&str], problems: &mut Vec<SchemaError>) {
    let mut seen = HashSet::new();
    for cate in siblings {
        if !seen.insert(cate.code()) {
            problems.push(SchemaError::DuplicateCode {
                path: path.join("."),
                code: cate.code().to_string(),
            });
        }
    }
}
