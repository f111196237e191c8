// ── Empty-result recovery policy ──
//
// An empty client list is suspect data (the upstream fetcher sometimes
// hands the portal a half-rebuilt table), not a failure. The feed
// retries a bounded number of times with doubling delays, then surfaces
// a visible no-data state and falls back to the normal poll cadence.

use std::time::Duration;

const MAX_RETRIES: u8 = 3;

/// Bounded-backoff retry budget for empty poll results.
///
/// One budget spans one recovery *sequence*: consecutive empty fetches
/// advance it, any non-empty fetch resets it. An exhausted budget stays
/// exhausted (returns `None`) until reset, so an idle network does not
/// retrigger recovery on every scheduled tick.
#[derive(Debug)]
pub(crate) struct EmptyRecovery {
    base_delay: Duration,
    attempt: u8,
}

impl EmptyRecovery {
    pub(crate) fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            attempt: 0,
        }
    }

    /// Record an empty fetch. Returns the delay before the next retry,
    /// or `None` when the budget is spent.
    pub(crate) fn on_empty(&mut self) -> Option<Duration> {
        if self.attempt >= MAX_RETRIES {
            return None;
        }
        let delay = self.base_delay * 2u32.pow(u32::from(self.attempt));
        self.attempt += 1;
        Some(delay)
    }

    /// Record a non-empty fetch: the next empty result starts a fresh
    /// recovery sequence.
    pub(crate) fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Whether a recovery sequence is in progress or exhausted.
    pub(crate) fn is_active(&self) -> bool {
        self.attempt > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_gives_up() {
        let mut r = EmptyRecovery::new(Duration::from_secs(2));
        assert_eq!(r.on_empty(), Some(Duration::from_secs(2)));
        assert_eq!(r.on_empty(), Some(Duration::from_secs(4)));
        assert_eq!(r.on_empty(), Some(Duration::from_secs(8)));
        assert_eq!(r.on_empty(), None);
        // Still exhausted on the next idle tick — no re-trigger.
        assert_eq!(r.on_empty(), None);
    }

    #[test]
    fn spent_budget_yields_nothing_on_later_ticks() {
        let mut r = EmptyRecovery::new(Duration::from_millis(10));
        while r.on_empty().is_some() {}

        // A scheduled tick that still sees an empty list draws nothing
        // from the budget, so the caller has no retry work (and no
        // exhaustion report) to repeat.
        assert_eq!(r.on_empty(), None);
        assert!(r.is_active());
    }

    #[test]
    fn non_empty_resets_the_budget() {
        let mut r = EmptyRecovery::new(Duration::from_secs(2));
        assert!(r.on_empty().is_some());
        assert!(r.is_active());

        r.reset();
        assert!(!r.is_active());
        assert_eq!(r.on_empty(), Some(Duration::from_secs(2)));
    }
}
