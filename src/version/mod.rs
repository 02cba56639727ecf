//! Version bump aggregation and next-version calculation.

pub mod bump;
pub mod next;

pub use bump::{Severity, aggregate};
pub use next::{PreReleaseStage, clean_version, next_version};
