use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Accuracy profile and category derived from a trial log.
///
/// The same shape is accepted from the remote diagnosis service, so the wire
/// names are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: String,
    pub accuracy_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset_accuracy_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl ClassificationResult {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Where the classification shown to the user came from.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Local,
    Remote,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Local => "local",
            ClassificationSource::Remote => "remote",
        }
    }
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive Ishihara outcome.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum IshiharaCategory {
    Normal,
    MildDeficiency,
    StrongDeficiency,
}

impl IshiharaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IshiharaCategory::Normal => "Normal",
            IshiharaCategory::MildDeficiency => "Mild Deficiency",
            IshiharaCategory::StrongDeficiency => "Strong Deficiency",
        }
    }
}

impl fmt::Display for IshiharaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupational fitness outcome of the lantern test.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum LanternVerdict {
    Fit,
    Unfit,
}

impl LanternVerdict {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            LanternVerdict::Fit
        } else {
            LanternVerdict::Unfit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LanternVerdict::Fit => "FIT",
            LanternVerdict::Unfit => "UNFIT",
        }
    }
}

impl fmt::Display for LanternVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_strings() {
        assert_eq!(IshiharaCategory::MildDeficiency.to_string(), "Mild Deficiency");
        assert_eq!(LanternVerdict::from_passed(true).as_str(), "FIT");
        assert_eq!(LanternVerdict::from_passed(false).as_str(), "UNFIT");
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = r#"{"category":"Normal","accuracyPct":83.3}"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.category, "Normal");
        assert_eq!(result.subset_accuracy_pct, None);
        assert_eq!(result.passed, None);
        assert!(result.metrics.is_empty());
    }
}
