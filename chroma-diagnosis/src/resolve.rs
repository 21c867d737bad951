use chroma_core::{ClassificationResult, ClassificationSource, TestType};

/// What became of one remote diagnosis request.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisOutcome {
    Ok(ClassificationResult),
    Timeout,
    ServiceError(String),
}

/// The classification to display, where it came from, and an optional note
/// for the user when the remote result could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: ClassificationResult,
    pub source: ClassificationSource,
    pub note: Option<String>,
}

/// Picks the classification to show. The remote result only ever replaces
/// an Ishihara classification; lantern verdicts are always local.
pub fn resolve(
    test_type: TestType,
    local: ClassificationResult,
    outcome: DiagnosisOutcome,
) -> Resolution {
    let fallback = |note: String| Resolution {
        result: local.clone(),
        source: ClassificationSource::Local,
        note: Some(note),
    };

    match (test_type, outcome) {
        (TestType::Lantern, _) => Resolution {
            result: local.clone(),
            source: ClassificationSource::Local,
            note: None,
        },
        (TestType::Ishihara, DiagnosisOutcome::Ok(result)) => Resolution {
            result,
            source: ClassificationSource::Remote,
            note: None,
        },
        (TestType::Ishihara, DiagnosisOutcome::Timeout) => {
            fallback("Remote diagnosis timed out; showing local result".into())
        }
        (TestType::Ishihara, DiagnosisOutcome::ServiceError(reason)) => {
            fallback(format!("Remote diagnosis unavailable ({reason}); showing local result"))
        }
    }
}
