//! dyschema: question schema templates
//!
//! Hierarchical question schemas (categories down to a fixed leaf depth,
//! questions on the leaves), generic traversal and transformation over
//! them, and a concurrent cache that serves the active template and sealed
//! historical versions.

pub mod cli;
pub mod core;
pub mod schema;
