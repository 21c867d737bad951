use crate::stimulus::{LightColor, LightPair};
use serde::{Deserialize, Serialize};

/// Raw answer captured from the user for the active trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Digits(String),
    Lights { left: LightColor, right: LightColor },
}

impl Response {
    /// String form stored in the trial log.
    pub fn to_answer(&self) -> String {
        match self {
            Response::Digits(d) => d.clone(),
            Response::Lights { left, right } => LightPair::new(*left, *right).to_string(),
        }
    }
}

/// Recorded result per trial. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    pub item_id: u32,
    pub user_response: Option<String>,
    pub correct_response: String,
    pub is_correct: bool,
    pub response_time_ms: f64,
}

impl TrialRecord {
    pub fn timed_out(&self) -> bool {
        self.user_response.is_none()
    }
}
