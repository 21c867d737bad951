use crate::error::DiagnosisError;
use crate::resolve::DiagnosisOutcome;
use crate::Answers;
use async_trait::async_trait;
use chroma_core::ClassificationResult;
use std::time::Duration;

/// A service able to classify a set of Ishihara answers.
#[async_trait]
pub trait RemoteDiagnosis: Send + Sync {
    async fn diagnose(&self, answers: &Answers) -> Result<ClassificationResult, DiagnosisError>;
}

/// POSTs the answers as JSON and expects a classification back.
pub struct HttpDiagnosisClient {
    client: reqwest::Client,
    url: String,
}

impl HttpDiagnosisClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteDiagnosis for HttpDiagnosisClient {
    async fn diagnose(&self, answers: &Answers) -> Result<ClassificationResult, DiagnosisError> {
        tracing::debug!(url = %self.url, answers = answers.len(), "Requesting remote diagnosis");
        let response = self.client.post(&self.url).json(answers).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiagnosisError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        parse_remote_payload(&body)
    }
}

/// Decodes and validates a service response. A payload that parses but
/// carries an empty category or an accuracy outside 0..=100 is rejected.
pub fn parse_remote_payload(body: &[u8]) -> Result<ClassificationResult, DiagnosisError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let result: ClassificationResult = serde_json::from_value(value)
        .map_err(|e| DiagnosisError::Schema(e.to_string()))?;

    if result.category.trim().is_empty() {
        return Err(DiagnosisError::Schema("empty category".into()));
    }
    if !result.accuracy_pct.is_finite() || !(0.0..=100.0).contains(&result.accuracy_pct) {
        return Err(DiagnosisError::Schema(format!(
            "accuracy out of range: {}",
            result.accuracy_pct
        )));
    }
    Ok(result)
}

/// Runs one diagnosis request bounded by `timeout`. Never fails: every
/// problem is folded into the returned outcome.
pub async fn request_remote_diagnosis(
    service: &dyn RemoteDiagnosis,
    answers: &Answers,
    timeout: Duration,
) -> DiagnosisOutcome {
    match tokio::time::timeout(timeout, service.diagnose(answers)).await {
        Ok(Ok(result)) => {
            tracing::info!(category = %result.category, "Remote diagnosis received");
            DiagnosisOutcome::Ok(result)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Remote diagnosis failed");
            DiagnosisOutcome::ServiceError(e.to_string())
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Remote diagnosis timed out");
            DiagnosisOutcome::Timeout
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(ClassificationResult);

    #[async_trait]
    impl RemoteDiagnosis for Fixed {
        async fn diagnose(&self, _: &Answers) -> Result<ClassificationResult, DiagnosisError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl RemoteDiagnosis for Broken {
        async fn diagnose(&self, _: &Answers) -> Result<ClassificationResult, DiagnosisError> {
            Err(DiagnosisError::Status(503))
        }
    }

    struct Stalled;

    #[async_trait]
    impl RemoteDiagnosis for Stalled {
        async fn diagnose(&self, _: &Answers) -> Result<ClassificationResult, DiagnosisError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(DiagnosisError::Schema("unreachable".into()))
        }
    }

    fn remote() -> ClassificationResult {
        parse_remote_payload(br#"{"category":"Protanopia","accuracyPct":50}"#).unwrap()
    }

    #[test]
    fn payload_validation() {
        assert_eq!(remote().category, "Protanopia");
        assert!(matches!(
            parse_remote_payload(b"<html>"),
            Err(DiagnosisError::Decode(_))
        ));
        assert!(matches!(
            parse_remote_payload(br#"{"accuracyPct":50}"#),
            Err(DiagnosisError::Schema(_))
        ));
        assert!(matches!(
            parse_remote_payload(br#"{"category":" ","accuracyPct":50}"#),
            Err(DiagnosisError::Schema(_))
        ));
        assert!(matches!(
            parse_remote_payload(br#"{"category":"Normal","accuracyPct":140}"#),
            Err(DiagnosisError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn successful_request() {
        let outcome =
            request_remote_diagnosis(&Fixed(remote()), &Answers::new(), Duration::from_secs(5))
                .await;
        assert_eq!(outcome, DiagnosisOutcome::Ok(remote()));
    }

    #[tokio::test]
    async fn service_error_is_folded() {
        let outcome =
            request_remote_diagnosis(&Broken, &Answers::new(), Duration::from_secs(5)).await;
        assert!(matches!(outcome, DiagnosisOutcome::ServiceError(msg) if msg.contains("503")));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_service_times_out() {
        let outcome =
            request_remote_diagnosis(&Stalled, &Answers::new(), Duration::from_millis(5_000))
                .await;
        assert_eq!(outcome, DiagnosisOutcome::Timeout);
    }
}
