use chroma_core::{ClassificationResult, ClassificationSource, TestType, TrialRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a finished session produced, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub test_type: TestType,
    pub trial_log: Vec<TrialRecord>,
    pub classification: ClassificationResult,
    pub source: ClassificationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SessionOutcome {
    pub fn local(test_type: TestType, trial_log: Vec<TrialRecord>) -> Self {
        let classification = chroma_scoring::classify(&trial_log, test_type);
        Self {
            test_type,
            trial_log,
            classification,
            source: ClassificationSource::Local,
            note: None,
        }
    }

    /// Answers keyed by item id, the payload sent for remote diagnosis.
    /// Unanswered trials map to `None`.
    pub fn answers(&self) -> BTreeMap<String, Option<String>> {
        self.trial_log
            .iter()
            .map(|r| (r.item_id.to_string(), r.user_response.clone()))
            .collect()
    }

    pub fn replace_classification(
        &mut self,
        classification: ClassificationResult,
        source: ClassificationSource,
        note: Option<String>,
    ) {
        self.classification = classification;
        self.source = source;
        self.note = note;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
