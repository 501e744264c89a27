use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    index: usize,
    text: String,
    deadline: Instant,
}

/// Trailing-edge debounce for auto-check submissions.
///
/// Each `schedule` replaces the pending text and pushes the deadline out, so a
/// burst of edits yields a single submission of the last text.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn schedule(&mut self, index: usize, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            index,
            text: text.into(),
            deadline: now + self.window,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Take the pending text if its window has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<(usize, String)> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self
                .pending
                .take()
                .map(|pending| (pending.index, pending.text)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_edits_replace_text_and_push_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule(0, "a", start);
        debouncer.schedule(0, "ab", start + Duration::from_millis(300));

        assert_eq!(debouncer.take_due(start + Duration::from_millis(500)), None);
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(800))
        );
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(800)),
            Some((0, "ab".to_string()))
        );
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn cancel_drops_pending_text() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(2, "x", start);
        debouncer.cancel();
        assert_eq!(debouncer.take_due(start + Duration::from_secs(1)), None);
    }
}
