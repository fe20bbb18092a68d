//! CLI command implementations

pub mod completions;
pub mod get;
pub mod import;
pub mod init;
pub mod leafs;
pub mod list;
pub mod questions;
pub mod seal;
pub mod validate;
