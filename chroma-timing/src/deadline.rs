use std::time::Duration;

/// Cancellable one-shot deadline on a [`crate::Timer`] timeline.
///
/// `fire` reports expiry at most once; a cancelled or already fired deadline
/// stays silent until it is armed again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    due_ns: Option<u64>,
}

impl Deadline {
    pub fn armed(now_ns: u64, after: Duration) -> Self {
        let mut d = Self::default();
        d.arm(now_ns, after);
        d
    }

    pub fn arm(&mut self, now_ns: u64, after: Duration) {
        self.due_ns = Some(now_ns.saturating_add(after.as_nanos() as u64));
    }

    pub fn cancel(&mut self) {
        self.due_ns = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ns.is_some()
    }

    pub fn is_expired(&self, now_ns: u64) -> bool {
        self.due_ns.is_some_and(|due| now_ns >= due)
    }

    /// Returns true exactly once when `now_ns` reaches the deadline.
    pub fn fire(&mut self, now_ns: u64) -> bool {
        if self.is_expired(now_ns) {
            self.due_ns = None;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now_ns: u64) -> Option<Duration> {
        self.due_ns
            .map(|due| Duration::from_nanos(due.saturating_sub(now_ns)))
    }
}
