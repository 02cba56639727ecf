//! Conventional commit parsing and classification.

pub mod classify;
pub mod parser;

pub use classify::{BumpTypeConfig, classify, classify_commit};
pub use parser::{ConventionalCommit, Footer, Note, parse};
