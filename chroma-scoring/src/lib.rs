pub mod ishihara;
pub mod lantern;

pub use ishihara::{classify_ishihara, IshiharaThresholds};
pub use lantern::{classify_lantern, LanternThresholds};

use chroma_core::{ClassificationResult, TestType, TrialRecord};

/// Scores a trial log. Pure: the same log always yields the same result, and
/// partial logs are scored over whatever was completed.
pub fn classify(trial_log: &[TrialRecord], test_type: TestType) -> ClassificationResult {
    match test_type {
        TestType::Ishihara => classify_ishihara(trial_log),
        TestType::Lantern => classify_lantern(trial_log),
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
