//! Search control — stop flag and wall-clock budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Controls when a search should stop.
///
/// The stop flag is polled at every recursion entry; the clock is consulted
/// only every 1024 nodes to keep the check cheap. Cancellation is cooperative:
/// the search may overshoot a deadline by one subtree evaluation, and the
/// driver falls back to the last fully completed depth either way.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    deadline: Option<Instant>,
}

impl SearchControl {
    /// Control for `go infinite` or fixed-depth search: only the external
    /// stop flag can end it.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            deadline: None,
        }
    }

    /// Control with a wall-clock budget. The clock starts immediately.
    pub fn new_timed(stopped: Arc<AtomicBool>, budget: Duration) -> Self {
        let start = Instant::now();
        Self {
            stopped,
            start,
            deadline: Some(start + budget),
        }
    }

    /// Whether the in-flight search should abort.
    ///
    /// The flag is checked on every call; the deadline only when `nodes` is a
    /// multiple of 1024. Once the deadline fires, the flag is set so later
    /// calls short-circuit.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if nodes & 1023 != 0 {
            return false;
        }

        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        false
    }

    /// Whether iterative deepening should skip starting another depth.
    /// Checked between depth iterations.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Time elapsed since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Reference to the shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_control_never_stops_on_its_own() {
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        assert!(!control.should_stop(0));
        assert!(!control.should_stop(1024));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn stop_flag_stops_at_any_node_count() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(Arc::clone(&flag));
        assert!(!control.should_stop(17));
        flag.store(true, Ordering::Release);
        assert!(control.should_stop(17));
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn expired_deadline_stops_on_clock_check() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_timed(Arc::clone(&flag), Duration::ZERO);
        // Off-boundary node counts skip the clock.
        assert!(!control.should_stop(5));
        // The boundary check fires and latches the stop flag.
        assert!(control.should_stop(1024));
        assert!(control.should_stop(5));
        assert!(flag.load(Ordering::Acquire));
    }

    #[test]
    fn deadline_stops_iteration() {
        let control =
            SearchControl::new_timed(Arc::new(AtomicBool::new(false)), Duration::ZERO);
        assert!(control.should_stop_iterating());
    }
}
