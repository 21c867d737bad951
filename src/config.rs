use anyhow::{Context, Result};
use chroma_diagnosis::DiagnosisConfig;
use chroma_plate::GeneratorConfig;
use chroma_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file accepted by `--config`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub generator: GeneratorConfig,
    pub diagnosis: DiagnosisConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Command-line endpoint wins over the file.
    pub fn with_diagnosis_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.diagnosis.url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"session": {{"plate_count": 3}}, "diagnosis": {{"url": "http://localhost:9/x"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.session.plate_count, 3);
        assert_eq!(config.session.ishihara_time_limit_ms, 15_000);
        assert_eq!(config.generator, GeneratorConfig::default());
        assert!(config.diagnosis.is_enabled());
        assert_eq!(config.diagnosis.timeout_ms, 5_000);
    }

    #[test]
    fn cli_url_overrides_file() {
        let config = AppConfig::default().with_diagnosis_url(Some("http://a".into()));
        assert_eq!(config.diagnosis.url.as_deref(), Some("http://a"));
        let kept = config.clone().with_diagnosis_url(None);
        assert_eq!(kept.diagnosis.url.as_deref(), Some("http://a"));
    }

    #[test]
    fn broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
