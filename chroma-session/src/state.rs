use super::config::{SessionConfig, LANTERN_EXPOSURE_MS};
use super::outcome::SessionOutcome;
use super::trial::{ActiveTrial, TrialTimestamps};
use chroma_core::{
    LightPairSpec, PlateSpec, Response, SequencerState, TestItem, TestType, TrialRecord,
};
use chroma_timing::{Deadline, Timer};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Start,
    ResponseSubmitted { trial: usize, response: Response },
    Timeout { trial: usize },
    ExposureElapsed { trial: usize },
    Abort,
}

/// Items and results of one run of a test. Written only by the state machine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub test_type: TestType,
    pub items: Vec<TestItem>,
    pub current_index: usize,
    pub trial_log: Vec<TrialRecord>,
    /// Ishihara answer window, or the fixed exposure for lantern sessions.
    pub time_limit_ms_per_trial: u64,
    pub started_at_ms: f64,
}

impl TestSession {
    pub fn ishihara(plates: Vec<PlateSpec>, config: &SessionConfig) -> Self {
        Self::new(
            TestType::Ishihara,
            plates.into_iter().map(TestItem::Plate).collect(),
            config.ishihara_time_limit_ms,
        )
    }

    pub fn lantern(pairs: Vec<LightPairSpec>) -> Self {
        Self::new(
            TestType::Lantern,
            pairs.into_iter().map(TestItem::LightPair).collect(),
            LANTERN_EXPOSURE_MS,
        )
    }

    fn new(test_type: TestType, items: Vec<TestItem>, time_limit_ms_per_trial: u64) -> Self {
        Self {
            test_type,
            trial_log: Vec::with_capacity(items.len()),
            items,
            current_index: 0,
            time_limit_ms_per_trial,
            started_at_ms: 0.0,
        }
    }

    pub fn current_item(&self) -> Option<&TestItem> {
        self.items.get(self.current_index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.items.len()
    }
}

fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1_000_000.0
}

/// Drives a [`TestSession`] from `Idle` to `Completed`.
///
/// Callers feed discrete events: user submissions through [`Self::handle_event`]
/// and timer expiries collected by [`Self::update`]. Every submission names the
/// trial it answers; anything addressed to a trial other than the active one is
/// dropped.
pub struct SessionStateMachine<T: Timer> {
    session: TestSession,
    state: SequencerState,
    timer: T,
    current: Option<ActiveTrial>,
}

impl<T: Timer> SessionStateMachine<T> {
    pub fn new(session: TestSession, timer: T) -> Self {
        Self {
            session,
            state: SequencerState::Idle,
            timer,
            current: None,
        }
    }

    pub fn start(&mut self) -> bool {
        self.handle_event(SessionEvent::Start)
    }

    /// Submits an answer for `trial`. Returns false when it was ignored.
    pub fn submit(&mut self, trial: usize, response: Response) -> bool {
        self.handle_event(SessionEvent::ResponseSubmitted { trial, response })
    }

    pub fn abort(&mut self) -> bool {
        self.handle_event(SessionEvent::Abort)
    }

    /// Collects timer expiries for the active trial. Each deadline yields its
    /// event at most once.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let now = self.timer.now();
        let test_type = self.session.test_type;

        if let Some(trial) = &mut self.current {
            match (test_type, self.state) {
                (TestType::Ishihara, SequencerState::Presenting) => {
                    if trial.response_deadline.fire(now) {
                        events.push(SessionEvent::Timeout { trial: trial.index });
                    }
                }
                (TestType::Lantern, SequencerState::Presenting) => {
                    if trial.exposure_deadline.fire(now) {
                        events.push(SessionEvent::ExposureElapsed { trial: trial.index });
                    }
                }
                _ => {}
            }
        }
        events
    }

    /// Polls the timers and applies whatever fired. Returns the number of
    /// events that changed state.
    pub fn tick(&mut self) -> usize {
        self.update()
            .into_iter()
            .filter(|e| self.handle_event(e.clone()))
            .count()
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        let active = self.current.as_ref().map(|t| t.index);
        let handled = match (self.state, event) {
            (SequencerState::Idle, SessionEvent::Start) => {
                self.session.started_at_ms = ns_to_ms(self.timer.now());
                tracing::info!(
                    test = %self.session.test_type,
                    items = self.session.items.len(),
                    "Session started"
                );
                self.present_current();
                true
            }

            (state, SessionEvent::ResponseSubmitted { trial, response })
                if state.is_trial_active() && Some(trial) == active =>
            {
                if self.accepts(&response) {
                    self.score(Some(response));
                    true
                } else {
                    tracing::debug!(trial, state = ?self.state, "Response not accepted now");
                    false
                }
            }

            (SequencerState::Presenting, SessionEvent::Timeout { trial })
                if self.session.test_type == TestType::Ishihara && Some(trial) == active =>
            {
                tracing::info!(trial, "Trial timed out");
                self.score(None);
                true
            }

            (SequencerState::Presenting, SessionEvent::ExposureElapsed { trial })
                if self.session.test_type == TestType::Lantern && Some(trial) == active =>
            {
                let now = self.timer.now();
                if let Some(t) = &mut self.current {
                    t.timestamps.exposure_end = Some(now);
                }
                self.state = SequencerState::AwaitingResponse;
                tracing::debug!(trial, "Lights hidden, awaiting color selection");
                true
            }

            (state, SessionEvent::Abort) if !state.is_terminal() => {
                if let Some(mut t) = self.current.take() {
                    t.cancel_timers();
                }
                self.state = SequencerState::Aborted;
                tracing::info!(
                    completed = self.session.trial_log.len(),
                    "Session aborted"
                );
                true
            }

            (state, event) => {
                tracing::debug!(?state, ?event, active = ?active, "Ignoring stale or unexpected event");
                false
            }
        };
        handled
    }

    fn accepts(&self, response: &Response) -> bool {
        match (self.session.test_type, self.state, response) {
            (TestType::Ishihara, SequencerState::Presenting, Response::Digits(_)) => true,
            (TestType::Lantern, SequencerState::AwaitingResponse, Response::Lights { .. }) => true,
            _ => false,
        }
    }

    fn present_current(&mut self) {
        let Some(item) = self.session.current_item().cloned() else {
            self.complete();
            return;
        };

        let now = self.timer.now();
        let limit = Duration::from_millis(self.session.time_limit_ms_per_trial);
        let (response_deadline, exposure_deadline) = match self.session.test_type {
            TestType::Ishihara => (Deadline::armed(now, limit), Deadline::default()),
            TestType::Lantern => (
                Deadline::default(),
                Deadline::armed(now, Duration::from_millis(LANTERN_EXPOSURE_MS)),
            ),
        };

        let index = self.session.current_index;
        tracing::info!(trial = index, item = item.id(), "Trial started");
        self.current = Some(ActiveTrial {
            index,
            item,
            timestamps: TrialTimestamps {
                start: now,
                ..TrialTimestamps::default()
            },
            response_deadline,
            exposure_deadline,
        });
        self.state = SequencerState::Presenting;
    }

    /// Finalizes the active trial: one record appended, index advanced once.
    fn score(&mut self, response: Option<Response>) {
        let Some(mut trial) = self.current.take() else {
            return;
        };
        self.state = SequencerState::Scoring;
        trial.cancel_timers();

        let now = self.timer.now();
        trial.timestamps.response = response.as_ref().map(|_| now);

        let correct_response = trial.item.correct_answer();
        let user_response = response.map(|r| r.to_answer());
        let is_correct = user_response.as_deref() == Some(correct_response.as_str());
        let response_time_ms = ns_to_ms(now.saturating_sub(trial.timestamps.start));

        tracing::info!(
            trial = trial.index,
            item = trial.item.id(),
            answer = user_response.as_deref().unwrap_or("<none>"),
            is_correct,
            response_time_ms,
            "Trial scored"
        );

        self.session.trial_log.push(TrialRecord {
            item_id: trial.item.id(),
            user_response,
            correct_response,
            is_correct,
            response_time_ms,
        });
        self.session.current_index += 1;

        self.present_current();
    }

    fn complete(&mut self) {
        self.current = None;
        self.state = SequencerState::Completed;
        tracing::info!(
            test = %self.session.test_type,
            trials = self.session.trial_log.len(),
            "Session completed"
        );
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }

    pub fn trial_log(&self) -> &[TrialRecord] {
        &self.session.trial_log
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Index of the trial currently accepting events, if any.
    pub fn current_trial(&self) -> Option<usize> {
        self.current.as_ref().map(|t| t.index)
    }

    pub fn current_item(&self) -> Option<&TestItem> {
        self.current.as_ref().map(|t| &t.item)
    }

    /// Lantern lights are only visible before the exposure ends; plates stay
    /// visible for the whole trial.
    pub fn should_show_stimulus(&self) -> bool {
        self.state == SequencerState::Presenting
    }

    pub fn awaiting_selection(&self) -> bool {
        self.state == SequencerState::AwaitingResponse
    }

    /// Time left before the active deadline fires.
    pub fn remaining(&self) -> Option<Duration> {
        let now = self.timer.now();
        self.current.as_ref().and_then(|t| {
            t.response_deadline
                .remaining(now)
                .or_else(|| t.exposure_deadline.remaining(now))
        })
    }

    /// `(trials finished, total trials)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.session.trial_log.len(), self.session.items.len())
    }

    /// Trial log and local classification, available once completed.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.state
            .is_completed()
            .then(|| SessionOutcome::local(self.session.test_type, self.session.trial_log.clone()))
    }
}
