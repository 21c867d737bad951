use chroma_core::TestItem;
use chroma_timing::Deadline;

/// The one trial currently on screen.
#[derive(Debug, Clone)]
pub struct ActiveTrial {
    pub index: usize,
    pub item: TestItem,
    pub timestamps: TrialTimestamps,
    /// Ishihara answer window.
    pub response_deadline: Deadline,
    /// Lantern light exposure.
    pub exposure_deadline: Deadline,
}

impl ActiveTrial {
    pub fn cancel_timers(&mut self) {
        self.response_deadline.cancel();
        self.exposure_deadline.cancel();
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrialTimestamps {
    pub start: u64,
    pub exposure_end: Option<u64>,
    pub response: Option<u64>,
}
