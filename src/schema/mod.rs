//! Schema system - question trees, traversal and conversion

pub mod transform;
pub mod tree;
pub mod validator;
pub mod walker;

pub use transform::transform;
pub use tree::{Category, CategoryBasic, FlatQuestion, LeafInfo, QuestionDesc, QuestionsSchema};
pub use validator::SchemaError;
pub use walker::{QuestionVisitor, WalkMode, WalkOutput};
