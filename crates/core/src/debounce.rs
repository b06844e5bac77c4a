/// Trailing-edge debounce over caller-supplied timestamps (milliseconds).
///
/// Each [`trigger`](Self::trigger) pushes the deadline to `now + window`,
/// replacing any earlier one, so a burst of triggers settles into a single
/// firing `window` after the last of them. The debouncer never reads a clock
/// itself; hosts pass `performance.now()`, egui's input time, or a test clock.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Restart the quiet period at `now`.
    pub fn trigger(&mut self, now: f64) {
        self.deadline = Some(now + self.window_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline, 0 once it has passed.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now).max(0.0))
    }

    /// `true` exactly once per settled burst: when a deadline is pending and
    /// `now` has reached it. The deadline is consumed.
    pub fn fire_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
