//! Glue between keyboard input, the trial sequencer, stimulus resolution and
//! the background diagnosis request. Window-free so it can run under test.

use crate::input::{AnswerInput, InputAction};
use crate::scene::{Frame, View};
use chroma_core::{ClassificationSource, SequencerState, TestItem, TestType};
use chroma_diagnosis::{resolve, PendingDiagnosis, RemoteDiagnosis};
use chroma_plate::{AssetSource, Stimulus, StimulusResolver};
use chroma_session::{SessionOutcome, SessionStateMachine, TestSession};
use chroma_timing::Timer;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use winit::keyboard::KeyCode;

/// Remote service plus the runtime it is polled on.
pub struct DiagnosisLink {
    pub handle: Handle,
    pub service: Arc<dyn RemoteDiagnosis>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct Screening<T: Timer, A: AssetSource, R: Rng> {
    machine: SessionStateMachine<T>,
    resolver: StimulusResolver<A>,
    rng: R,
    input: AnswerInput,
    stimulus: Option<(usize, Stimulus)>,
    shown_trial: Option<usize>,
    outcome: Option<SessionOutcome>,
    diagnosis: Option<DiagnosisLink>,
    pending: Option<PendingDiagnosis>,
}

impl<T: Timer, A: AssetSource, R: Rng> Screening<T, A, R> {
    pub fn new(
        session: TestSession,
        timer: T,
        resolver: StimulusResolver<A>,
        rng: R,
        diagnosis: Option<DiagnosisLink>,
    ) -> Self {
        Self {
            machine: SessionStateMachine::new(session, timer),
            resolver,
            rng,
            input: AnswerInput::default(),
            stimulus: None,
            shown_trial: None,
            outcome: None,
            diagnosis,
            pending: None,
        }
    }

    pub fn start(&mut self) {
        self.machine.start();
        self.sync();
    }

    pub fn test_type(&self) -> TestType {
        self.machine.session().test_type
    }

    pub fn state(&self) -> SequencerState {
        self.machine.state()
    }

    pub fn machine(&self) -> &SessionStateMachine<T> {
        &self.machine
    }

    pub fn timer_mut(&mut self) -> &mut T {
        self.machine.timer_mut()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn diagnosis_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn on_key(&mut self, key: KeyCode) -> Control {
        let state = self.machine.state();
        if state.is_terminal() {
            return match key {
                KeyCode::Escape | KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => {
                    Control::Exit
                }
                _ => Control::Continue,
            };
        }
        // lantern answers open only once the lights are out
        if self.test_type() == TestType::Lantern
            && !self.machine.awaiting_selection()
            && key != KeyCode::Escape
        {
            return Control::Continue;
        }

        match self.input.on_key(key, self.test_type()) {
            InputAction::None => {}
            InputAction::Abort => {
                self.machine.abort();
                return Control::Exit;
            }
            InputAction::Submit(response) => {
                if let Some(trial) = self.machine.current_trial() {
                    self.machine.submit(trial, response);
                }
            }
        }
        self.sync();
        Control::Continue
    }

    /// Per-frame work: fire deadlines, follow trial changes, collect the
    /// diagnosis result.
    pub fn update(&mut self) {
        self.machine.tick();
        self.sync();
        self.poll_diagnosis();
    }

    fn sync(&mut self) {
        let trial = self.machine.current_trial();
        if trial != self.shown_trial {
            self.shown_trial = trial;
            self.input.clear();
            self.stimulus = None;
            if let (Some(index), Some(TestItem::Plate(plate))) =
                (trial, self.machine.current_item())
            {
                let stimulus = self.resolver.resolve(plate, index, &mut self.rng);
                self.stimulus = Some((index, stimulus));
            }
        }

        if self.outcome.is_none() {
            if let Some(outcome) = self.machine.outcome() {
                self.on_completed(outcome);
            }
        }
    }

    fn on_completed(&mut self, outcome: SessionOutcome) {
        let c = &outcome.classification;
        tracing::info!(
            test = %outcome.test_type,
            category = %c.category,
            accuracy_pct = c.accuracy_pct,
            "Local classification"
        );

        if outcome.test_type == TestType::Ishihara {
            if let Some(link) = &self.diagnosis {
                self.pending = Some(PendingDiagnosis::spawn(
                    &link.handle,
                    link.service.clone(),
                    outcome.answers(),
                    link.timeout,
                ));
            }
        }
        self.outcome = Some(outcome);
    }

    fn poll_diagnosis(&mut self) {
        let (Some(pending), Some(outcome)) = (self.pending.as_mut(), self.outcome.as_mut()) else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };

        let resolution = resolve(outcome.test_type, outcome.classification.clone(), result);
        if resolution.source == ClassificationSource::Remote {
            tracing::info!(category = %resolution.result.category, "Showing remote classification");
        }
        if let Some(note) = &resolution.note {
            tracing::info!("{note}");
        }
        outcome.replace_classification(resolution.result, resolution.source, resolution.note);
    }

    pub fn frame(&self) -> Frame<'_> {
        let progress = self.machine.progress();
        let view = match self.machine.state() {
            SequencerState::Completed => match &self.outcome {
                Some(outcome) => View::Result {
                    category: &outcome.classification.category,
                    accuracy_pct: outcome.classification.accuracy_pct,
                    passed: outcome.classification.passed,
                    pending_remote: self.diagnosis_pending(),
                },
                None => View::Idle,
            },
            state if state.is_trial_active() => self.trial_view(),
            _ => View::Idle,
        };
        Frame { view, progress }
    }

    fn trial_view(&self) -> View<'_> {
        match self.machine.current_item() {
            Some(TestItem::Plate(plate)) => match &self.stimulus {
                Some((_, stimulus)) => {
                    let limit = self.machine.session().time_limit_ms_per_trial.max(1) as f32;
                    let left = self
                        .machine
                        .remaining()
                        .map_or(0.0, |d| d.as_millis() as f32 / limit);
                    View::Plate {
                        item_id: plate.id,
                        stimulus,
                        typed: self.input.digits(),
                        time_left: left,
                    }
                }
                None => View::Idle,
            },
            Some(TestItem::LightPair(spec)) => View::Lights {
                shown: self
                    .machine
                    .should_show_stimulus()
                    .then(|| spec.pair()),
                picked: self.input.lights(),
            },
            None => View::Idle,
        }
    }
}
