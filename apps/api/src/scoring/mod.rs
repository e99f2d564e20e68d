pub mod completeness;

pub use completeness::{compute_completeness_report, CompletenessReport};
