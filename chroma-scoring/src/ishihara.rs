use crate::percent;
use chroma_core::{ClassificationResult, IshiharaCategory, TrialRecord};
use std::collections::BTreeMap;

/// Banding used by the local Ishihara classification.
///
/// The bands do not cover every combination: anything outside both the
/// normal and the mild band falls through to strong deficiency, including
/// four or more correct answers at a slow average pace.
pub struct IshiharaThresholds;

impl IshiharaThresholds {
    pub const NORMAL_MIN_CORRECT: usize = 4;
    pub const NORMAL_MAX_AVG_S: f64 = 8.0;
    pub const MILD_CORRECT: (usize, usize) = (2, 3);
    pub const MILD_AVG_S: (f64, f64) = (8.0, 12.0);

    pub fn categorize(correct_count: usize, avg_response_time_s: f64) -> IshiharaCategory {
        let (mild_lo, mild_hi) = Self::MILD_CORRECT;
        let (slow_lo, slow_hi) = Self::MILD_AVG_S;
        if correct_count >= Self::NORMAL_MIN_CORRECT && avg_response_time_s < Self::NORMAL_MAX_AVG_S
        {
            IshiharaCategory::Normal
        } else if (mild_lo..=mild_hi).contains(&correct_count)
            && (slow_lo..=slow_hi).contains(&avg_response_time_s)
        {
            IshiharaCategory::MildDeficiency
        } else {
            IshiharaCategory::StrongDeficiency
        }
    }
}

pub fn classify_ishihara(trial_log: &[TrialRecord]) -> ClassificationResult {
    let total = trial_log.len();
    let correct_count = trial_log.iter().filter(|r| r.is_correct).count();
    let avg_response_time_s = if total == 0 {
        0.0
    } else {
        trial_log.iter().map(|r| r.response_time_ms).sum::<f64>() / total as f64 / 1000.0
    };
    let timeouts = trial_log.iter().filter(|r| r.timed_out()).count();

    let category = if total == 0 {
        IshiharaCategory::StrongDeficiency
    } else {
        IshiharaThresholds::categorize(correct_count, avg_response_time_s)
    };
    tracing::debug!(
        correct_count,
        total,
        avg_response_time_s,
        category = category.as_str(),
        "Classified Ishihara log"
    );

    let metrics = BTreeMap::from([
        ("correct_count".to_string(), correct_count as f64),
        ("total_trials".to_string(), total as f64),
        ("avg_response_time_s".to_string(), avg_response_time_s),
        ("timeouts".to_string(), timeouts as f64),
    ]);

    ClassificationResult {
        category: category.as_str().to_string(),
        accuracy_pct: percent(correct_count, total),
        subset_accuracy_pct: None,
        passed: None,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(correct: usize, total: usize, response_ms: f64) -> Vec<TrialRecord> {
        (0..total)
            .map(|i| TrialRecord {
                item_id: i as u32 + 1,
                user_response: Some(if i < correct { "12" } else { "99" }.to_string()),
                correct_response: "12".to_string(),
                is_correct: i < correct,
                response_time_ms: response_ms,
            })
            .collect()
    }

    fn category(correct: usize, total: usize, response_ms: f64) -> String {
        classify_ishihara(&log(correct, total, response_ms)).category
    }

    #[test]
    fn fast_and_accurate_is_normal() {
        assert_eq!(category(4, 6, 3000.0), "Normal");
        assert_eq!(category(6, 6, 7999.0), "Normal");
    }

    #[test]
    fn mild_band_is_inclusive_on_both_ends() {
        assert_eq!(category(2, 6, 8000.0), "Mild Deficiency");
        assert_eq!(category(3, 6, 12000.0), "Mild Deficiency");
        assert_eq!(category(3, 6, 10000.0), "Mild Deficiency");
    }

    #[test]
    fn accurate_but_slow_falls_through_to_strong() {
        // four correct at 10 s average matches neither band
        assert_eq!(category(4, 6, 10000.0), "Strong Deficiency");
        assert_eq!(category(4, 6, 8000.0), "Strong Deficiency");
    }

    #[test]
    fn gaps_below_the_bands_are_strong() {
        assert_eq!(category(1, 6, 2000.0), "Strong Deficiency");
        assert_eq!(category(0, 6, 2000.0), "Strong Deficiency");
        assert_eq!(category(3, 6, 5000.0), "Strong Deficiency");
        assert_eq!(category(2, 6, 12001.0), "Strong Deficiency");
    }

    #[test]
    fn metrics_and_accuracy() {
        let mut records = log(3, 4, 6000.0);
        records[3].user_response = None;
        records[3].response_time_ms = 14000.0;
        let result = classify_ishihara(&records);
        assert_eq!(result.accuracy_pct, 75.0);
        assert_eq!(result.metric("correct_count"), Some(3.0));
        assert_eq!(result.metric("timeouts"), Some(1.0));
        assert_eq!(result.metric("avg_response_time_s"), Some(8.0));
        assert_eq!(result.category, "Mild Deficiency");
        assert_eq!(result.passed, None);
        assert_eq!(result.subset_accuracy_pct, None);
    }

    #[test]
    fn empty_log_is_strong_with_zero_accuracy() {
        let result = classify_ishihara(&[]);
        assert_eq!(result.category, "Strong Deficiency");
        assert_eq!(result.accuracy_pct, 0.0);
    }
}
