use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred work produced by a transition. Each variant is a correction that
/// reads current state when it fires, so firing late, twice, or after an
/// unrelated transition leaves the book consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Settle the z-order of a page that just turned back.
    ReleaseZHold { index: usize },
    /// Fade the celebration overlay in, optionally launching confetti.
    RevealCelebration { launch_confetti: bool },
    /// Hide the overlay once its fade-out finished.
    HideCelebration,
    /// Fade the decline response message in.
    RevealResponse,
    /// Re-run content fitting after layout settled.
    FitContent,
}

/// Continuations ordered by deadline, ties broken by scheduling order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: BTreeMap<(Duration, u64), Continuation>,
    next_seq: u64,
}

impl Timeline {
    pub fn schedule(&mut self, now: Duration, delay: Duration, continuation: Continuation) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries
            .insert((now.saturating_add(delay), seq), continuation);
    }

    /// Removes and returns everything due at `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<(Duration, Continuation)> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            let (deadline, _seq) = *entry.key();
            if deadline > now {
                break;
            }
            due.push((deadline, entry.remove()));
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Continuation> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Continuation, Timeline};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn take_due_returns_deadline_order_and_keeps_future_work() {
        let mut timeline = Timeline::default();
        timeline.schedule(ms(0), ms(500), Continuation::ReleaseZHold { index: 1 });
        timeline.schedule(ms(0), ms(50), Continuation::FitContent);
        timeline.schedule(ms(10), ms(0), Continuation::HideCelebration);

        let due = timeline.take_due(ms(60));
        assert_eq!(
            due,
            vec![
                (ms(10), Continuation::HideCelebration),
                (ms(50), Continuation::FitContent),
            ]
        );
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.next_deadline(), Some(ms(500)));
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut timeline = Timeline::default();
        timeline.schedule(ms(0), ms(5), Continuation::RevealResponse);
        timeline.schedule(ms(0), ms(5), Continuation::FitContent);

        let due: Vec<_> = timeline.take_due(ms(5)).into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            due,
            vec![Continuation::RevealResponse, Continuation::FitContent]
        );
        assert!(timeline.is_empty());
    }
}
