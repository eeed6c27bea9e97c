//! Address classification: pattern-based detection plus async enrichment.

pub mod detector;
pub mod enrichment;

pub use detector::detect;
pub use enrichment::{refine, AccountInspector};
