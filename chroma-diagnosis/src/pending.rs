use crate::client::{request_remote_diagnosis, RemoteDiagnosis};
use crate::resolve::DiagnosisOutcome;
use crate::Answers;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// A diagnosis request running in the background.
///
/// Frame loops call [`PendingDiagnosis::poll`] once per frame; it never
/// blocks and yields the outcome exactly once.
pub struct PendingDiagnosis {
    rx: Option<oneshot::Receiver<DiagnosisOutcome>>,
}

impl PendingDiagnosis {
    pub fn spawn(
        handle: &Handle,
        service: Arc<dyn RemoteDiagnosis>,
        answers: Answers,
        timeout: Duration,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        handle.spawn(async move {
            let outcome = request_remote_diagnosis(service.as_ref(), &answers, timeout).await;
            // receiver gone means the session was closed; nothing to report
            let _ = tx.send(outcome);
        });
        Self { rx: Some(rx) }
    }

    pub fn poll(&mut self) -> Option<DiagnosisOutcome> {
        let rx = self.rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => {
                DiagnosisOutcome::ServiceError("diagnosis task ended without a result".into())
            }
        };
        self.rx = None;
        Some(outcome)
    }

    pub fn is_finished(&self) -> bool {
        self.rx.is_none()
    }
}
