use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("Diagnosis request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Diagnosis service returned HTTP {0}")]
    Status(u16),

    #[error("Diagnosis response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Diagnosis response rejected: {0}")]
    Schema(String),
}
