use serde::{Deserialize, Serialize};

/// Lifecycle of a test session as driven by the trial sequencer.
///
/// `Scoring` is transient: the sequencer enters it when a response or a
/// timeout finalizes the active trial and leaves it in the same call.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    #[default]
    Idle,
    Presenting,
    AwaitingResponse,
    Scoring,
    Completed,
    Aborted,
}

impl SequencerState {
    /// A trial is on screen or waiting for an answer.
    pub fn is_trial_active(&self) -> bool {
        matches!(self, Self::Presenting | Self::AwaitingResponse)
    }

    /// No further events will be accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(SequencerState::default(), SequencerState::Idle);
    }

    #[test]
    fn active_and_terminal_are_disjoint() {
        use SequencerState::*;
        for state in [Idle, Presenting, AwaitingResponse, Scoring, Completed, Aborted] {
            assert!(!(state.is_trial_active() && state.is_terminal()));
        }
        assert!(Presenting.is_trial_active());
        assert!(AwaitingResponse.is_trial_active());
        assert!(Completed.is_terminal());
        assert!(Aborted.is_terminal());
        assert!(!Aborted.is_completed());
    }
}
