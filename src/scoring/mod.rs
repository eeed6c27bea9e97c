//! Score aggregation: normalization, verdicts and record assembly.

pub mod normalize;
pub mod record;
pub mod verdict;

pub use normalize::{clamp_score, normalize, Normalizer, SignalBundle, SignalMap};
pub use record::build_assessment_record;
pub use verdict::{derive_verdict, VerdictThresholds};
